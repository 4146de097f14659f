use crate::C;

/// Linear interpolation between `a` and `b` at fraction `s`.
pub(crate) fn lerp(a: C, b: C, s: C) -> C {
    a + (b - a) * s
}
