/*!

  Trace logging for the table construction phases. The macros expand to
  nothing unless the `trace` feature is enabled, so the hot paths carry
  no logging cost in normal builds.

*/

#[cfg(feature = "trace")]
#[macro_export]
macro_rules! debug_log {
  ($($args:tt)*) => {
    eprint!($($args)*)
  }
}

#[cfg(not(feature = "trace"))]
#[macro_export]
macro_rules! debug_log {
  ($($args:tt)*) => {
    ()
  }
}

#[cfg(feature = "trace")]
#[macro_export]
macro_rules! debug_logln {
  ($($args:tt)*) => {
    eprintln!($($args)*)
  }
}

#[cfg(not(feature = "trace"))]
#[macro_export]
macro_rules! debug_logln {
  ($($args:tt)*) => {
    ()
  }
}
