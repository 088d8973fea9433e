#![allow(unused_macros)]

//! Logging shims: route to `defmt` on firmware builds, `log` on host builds,
//! and compile to nothing when neither feature is enabled.

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($s $(, $x)*);
        #[cfg(all(not(feature = "defmt"), feature = "log"))]
        ::log::trace!($s $(, $x)*);
        #[cfg(all(not(feature = "defmt"), not(feature = "log")))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($s $(, $x)*);
        #[cfg(all(not(feature = "defmt"), feature = "log"))]
        ::log::debug!($s $(, $x)*);
        #[cfg(all(not(feature = "defmt"), not(feature = "log")))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($s $(, $x)*);
        #[cfg(all(not(feature = "defmt"), feature = "log"))]
        ::log::info!($s $(, $x)*);
        #[cfg(all(not(feature = "defmt"), not(feature = "log")))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($s $(, $x)*);
        #[cfg(all(not(feature = "defmt"), feature = "log"))]
        ::log::warn!($s $(, $x)*);
        #[cfg(all(not(feature = "defmt"), not(feature = "log")))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($s $(, $x)*);
        #[cfg(all(not(feature = "defmt"), feature = "log"))]
        ::log::error!($s $(, $x)*);
        #[cfg(all(not(feature = "defmt"), not(feature = "log")))]
        let _ = ($( & $x ),*);
    }};
}
