#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use rawcloud_image as image;

#[doc(inline)]
pub use rawcloud_3d as r3d;
