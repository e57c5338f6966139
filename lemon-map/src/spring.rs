/// A damped spring driving a single offset towards a target.
///
/// Stepped with semi-implicit Euler in sub-steps small enough to stay stable
/// for the stiffness and damping used by the sheet.
#[derive(Debug, Clone)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: f32,
    damping: f32,
    settled: bool,
}

const STIFFNESS: f32 = 100.0;
const MASS: f32 = 1.0;
const REST_DISPLACEMENT: f32 = 0.01;
const REST_SPEED: f32 = 2.0;
const MAX_STEP_SECS: f32 = 1.0 / 240.0;

impl Spring {
    pub fn new(value: f32, damping: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            damping,
            settled: true,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Starts animating towards `target`, keeping the current velocity.
    pub fn animate_to(&mut self, target: f32) {
        self.target = target;
        self.settled = false;
    }

    /// Moves to `value` immediately, cancelling any running animation.
    pub fn jump_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.settled = true;
    }

    /// Advances the animation by `dt` seconds. Returns whether it is still moving.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.settled {
            return false;
        }

        let mut remaining = dt.max(0.0);
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP_SECS);
            let force = -STIFFNESS * (self.value - self.target) - self.damping * self.velocity;
            self.velocity += force / MASS * h;
            self.value += self.velocity * h;
            remaining -= h;
        }

        if (self.value - self.target).abs() < REST_DISPLACEMENT && self.velocity.abs() < REST_SPEED
        {
            self.jump_to(self.target);
        }

        !self.settled
    }
}
