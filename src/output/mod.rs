mod optimizer;
mod png;

pub use optimizer::Optimizer;
pub use png::save_png;
