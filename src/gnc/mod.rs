pub mod smooth;
pub mod convergence;
pub mod burn;
pub mod throttle;

pub use smooth::{smooth_damp, smooth_damp_angle};
pub use convergence::ConvergenceController;
pub use burn::{burn_time, BurnEstimate, BurnPlanner};
pub use throttle::{goal_throttle, ThrottleShaper};
