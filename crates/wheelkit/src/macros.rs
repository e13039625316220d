#[macro_export]
macro_rules! impl_float_newtype {
    ($name:ty) => {
        impl $name {
            pub fn get(self) -> f64 {
                self.0
            }
        }
    };
}

#[cfg(test)]
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        assert_close!($left, $right, 1e-9)
    };
    ($left:expr, $right:expr, $eps:expr) => {{
        let (l, r): (f64, f64) = ($left, $right);
        assert!((l - r).abs() <= $eps, "{} is not within {} of {}", l, $eps, r);
    }};
}
