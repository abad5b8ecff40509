pub mod material;

pub use material::KeyGenerator;
pub use material::KeyMaterial;
pub use material::KEY_PREFIX;
pub use material::SECRET_BYTES;
