use num::ToPrimitive;

/// Trait for cell types that reserve a value to represent a missing cell.
/// Integer cells use their minimum value as nodata, floating point cells use NaN.
pub trait Nodata: ToPrimitive + PartialEq + Sized + Copy {
    const NODATA: Self;

    #[inline]
    fn is_nodata(self) -> bool {
        self == Self::NODATA
    }

    /// For importing foreign data that may contain nodata values not adhering to the predefined `Self::NODATA` value.
    #[inline]
    fn init_nodata(&mut self, nodata: Self) {
        if *self == nodata {
            *self = Self::NODATA;
        }
    }
}

macro_rules! impl_nodata_fixed_point {
    ( $t:ident, $nodata:ident ) => {
        impl Nodata for $t {
            const NODATA: $t = $t::$nodata;
        }
    };
}

macro_rules! impl_nodata_floating_point {
    ( $t:ident ) => {
        impl Nodata for $t {
            const NODATA: $t = $t::NAN;

            #[inline]
            fn is_nodata(self) -> bool {
                self.is_nan()
            }

            #[inline]
            fn init_nodata(&mut self, nodata: Self) {
                // a NaN nodata value is already the canonical representation
                if !nodata.is_nan() && *self == nodata {
                    *self = Self::NODATA;
                }
            }
        }
    };
}

impl_nodata_fixed_point!(i32, MIN);

impl_nodata_floating_point!(f32);
impl_nodata_floating_point!(f64);
