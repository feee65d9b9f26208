/// Runs the expression and reports how many milliseconds it took.
///
/// # Examples
/// `
/// assert_eq!(crate::log::measure! { 2 + 2 }, 4)
/// `
#[cfg(target_arch = "wasm32")]
macro_rules! measure {
    ($code:expr) => {{
        let start = crate::log::now();
        web_sys::console::log_3(
            &"measuring".into(),
            &stringify!($code).into(),
            &"...".into(),
        );
        let result = $code;

        let end = crate::log::now();
        web_sys::console::log_3(
            &(end - start).into(),
            &"milliseconds in".into(),
            &stringify!($code).into(),
        );

        result
    }};
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! measure {
    ($code:expr) => {{
        let start = crate::log::now();
        tracing::debug!("measuring {} ...", stringify!($code));
        let result = $code;

        let end = crate::log::now();
        tracing::debug!(
            milliseconds = end - start,
            "milliseconds in {}",
            stringify!($code)
        );

        result
    }};
}

pub(crate) use measure;

#[cfg(target_arch = "wasm32")]
mod clock {
    use wasm_bindgen::prelude::wasm_bindgen;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_name = performance)]
        static PERFORMANCE: web_sys::Performance;
    }

    pub(crate) fn now() -> f64 {
        PERFORMANCE.now()
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod clock {
    use std::{sync::OnceLock, time::Instant};

    /// Milliseconds since the clock was first read.
    pub(crate) fn now() -> f64 {
        static START: OnceLock<Instant> = OnceLock::new();
        START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
    }
}

pub(crate) use clock::now;
