pub mod anim;
pub mod calib;
pub mod drag;
pub mod mapping;
