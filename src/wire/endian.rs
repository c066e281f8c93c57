//! Host ↔ wire byte-order normalization.
//!
//! The PMT wire format is big-endian for every multi-byte field. Primitives
//! are written with the big-endian `bytes` helpers; [`WireOrder::to_wire`]
//! and the native-order accessors cover raw host-order sample memory.

use bytes::{Buf, BufMut};

use crate::types::Complex;

/// A fixed-width scalar that can be byte-swapped and written in wire order.
pub trait WireOrder: Copy {
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// Reverses the byte order. Operates on the bit pattern, so it is its
    /// own inverse for every value, including NaN payloads.
    fn swap(self) -> Self;

    /// Writes the native byte image of `self` without any reordering.
    fn put_native(self, buf: &mut impl BufMut);

    /// Reads a native byte image. The caller ensures `WIDTH` bytes remain.
    fn get_native(buf: &mut impl Buf) -> Self;

    /// Converts from host order to wire (big-endian) order.
    #[inline]
    fn to_wire(self) -> Self {
        if cfg!(target_endian = "little") {
            self.swap()
        } else {
            self
        }
    }

    /// Converts from wire order to host order.
    #[inline]
    fn from_wire(self) -> Self {
        self.to_wire()
    }

    /// Appends `self` in wire order.
    #[inline]
    fn put_wire(self, buf: &mut impl BufMut) {
        self.to_wire().put_native(buf);
    }

    /// Reads a value stored in wire order.
    #[inline]
    fn get_wire(buf: &mut impl Buf) -> Self {
        Self::get_native(buf).from_wire()
    }
}

macro_rules! impl_wire_order {
    ($($t:ty => $swap:expr, $put:ident, $get:ident, $put_ne:ident, $get_ne:ident;)*) => {$(
        impl WireOrder for $t {
            const WIDTH: usize = std::mem::size_of::<$t>();

            #[inline]
            fn swap(self) -> Self {
                $swap(self)
            }

            #[inline]
            fn put_native(self, buf: &mut impl BufMut) {
                buf.$put_ne(self);
            }

            #[inline]
            fn get_native(buf: &mut impl Buf) -> Self {
                buf.$get_ne()
            }

            #[inline]
            fn put_wire(self, buf: &mut impl BufMut) {
                buf.$put(self);
            }

            #[inline]
            fn get_wire(buf: &mut impl Buf) -> Self {
                buf.$get()
            }
        }
    )*};
}

// Single-byte types swap to themselves.
impl_wire_order! {
    u8 => u8::swap_bytes, put_u8, get_u8, put_u8, get_u8;
    i8 => i8::swap_bytes, put_i8, get_i8, put_i8, get_i8;
    u16 => u16::swap_bytes, put_u16, get_u16, put_u16_ne, get_u16_ne;
    i16 => i16::swap_bytes, put_i16, get_i16, put_i16_ne, get_i16_ne;
    u32 => u32::swap_bytes, put_u32, get_u32, put_u32_ne, get_u32_ne;
    i32 => i32::swap_bytes, put_i32, get_i32, put_i32_ne, get_i32_ne;
    u64 => u64::swap_bytes, put_u64, get_u64, put_u64_ne, get_u64_ne;
    i64 => i64::swap_bytes, put_i64, get_i64, put_i64_ne, get_i64_ne;
    f32 => swap_f32, put_f32, get_f32, put_f32_ne, get_f32_ne;
    f64 => swap_f64, put_f64, get_f64, put_f64_ne, get_f64_ne;
}

fn swap_f32(x: f32) -> f32 {
    f32::from_bits(x.to_bits().swap_bytes())
}

fn swap_f64(x: f64) -> f64 {
    f64::from_bits(x.to_bits().swap_bytes())
}

/// Components are swapped independently; real part stays first.
impl<T: WireOrder> WireOrder for Complex<T> {
    const WIDTH: usize = 2 * T::WIDTH;

    #[inline]
    fn swap(self) -> Self {
        Complex::new(self.re.swap(), self.im.swap())
    }

    #[inline]
    fn put_native(self, buf: &mut impl BufMut) {
        self.re.put_native(buf);
        self.im.put_native(buf);
    }

    #[inline]
    fn get_native(buf: &mut impl Buf) -> Self {
        let re = T::get_native(buf);
        let im = T::get_native(buf);
        Complex::new(re, im)
    }

    #[inline]
    fn put_wire(self, buf: &mut impl BufMut) {
        self.re.put_wire(buf);
        self.im.put_wire(buf);
    }

    #[inline]
    fn get_wire(buf: &mut impl Buf) -> Self {
        let re = T::get_wire(buf);
        let im = T::get_wire(buf);
        Complex::new(re, im)
    }
}
