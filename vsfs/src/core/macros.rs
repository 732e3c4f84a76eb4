// SPDX-License-Identifier: MIT

/// Generates the `From` conversions between the error layers.
///
/// `messages` lists the errors whose `Other` variant takes a `&'static str`.
/// Each following block names a target error and, for each wrapping variant,
/// the source error it holds.
///
/// ```ignore
/// fs_error_wiring! {
///     messages => [FsCheckerError];
///
///     FsCheckerError {
///         IO      <- VsIOError,
///         Parsing <- FsParsingError,
///     }
/// }
/// ```
#[macro_export]
macro_rules! fs_error_wiring {
    (
        messages => [ $( $msg_dst:ident ),* $(,)? ];
        $( $dst:ident { $( $variant:ident <- $src:ty ),+ $(,)? } )+
    ) => {
        $( $crate::__wrap_error!(&'static str => $msg_dst::Other); )*
        $( $( $crate::__wrap_error!($src => $dst::$variant); )+ )+
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __wrap_error {
    ($src:ty => $dst:ident :: $variant:ident) => {
        impl From<$src> for $dst {
            #[inline]
            fn from(e: $src) -> Self {
                $dst::$variant(e)
            }
        }
    };
}

/// Returns early with `$err.into()` when `$cond` does not hold.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err.into());
        }
    };
}
