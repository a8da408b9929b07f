// Runtime parameters
pub const OUT_FILE: &str = "./out.ppm";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Distance a shadow ray origin is lifted toward the light
pub const SHADOW_NUDGE: f64 = 0.0001;

// Phong exponent of the specular highlight
pub const SPECULAR_EXPONENT: i32 = 6;

// Maximum channel value written to 8-bit images
pub const MAX_CHANNEL: f64 = 255.0;
