pub mod color;
pub mod f32;
pub mod io;
pub mod resample;
pub mod traits;

pub use self::color::ColorImage;
pub use self::f32::{ChangeField, ImageF32};
pub use self::resample::AlignedPair;
pub use self::traits::ImageView;
