pub mod density;
pub mod scale;
pub mod types;

pub use density::{DensityRange, compute_density, drawable_extent};
pub use scale::{LinearScale, QuantizeScale, nice_ticks};
pub use types::{Dimensionality, Margin, Viewport};
