// tentcard-pdf: length unit conversions
//
// Screen pixels follow the CSS reference pixel (96 per inch), rounded to
// 37.8 px per centimetre. Points are 1/72 inch, so 1 px = 0.75 pt.

/// Pixels per centimetre
pub const PX_PER_CM: f64 = 37.8;

/// Points per pixel
pub const PT_PER_PX: f64 = 0.75;

/// Millimetres per centimetre
pub const MM_PER_CM: f64 = 10.0;

pub fn cm_to_px(cm: f64) -> f64 {
    cm * PX_PER_CM
}

pub fn px_to_pt(px: f64) -> f64 {
    px * PT_PER_PX
}

pub fn pt_to_px(pt: f64) -> f64 {
    pt / PT_PER_PX
}

pub fn cm_to_pt(cm: f64) -> f64 {
    px_to_pt(cm_to_px(cm))
}

pub fn cm_to_mm(cm: f64) -> f64 {
    cm * MM_PER_CM
}
