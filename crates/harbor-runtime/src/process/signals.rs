//! Mapping control signals to OS signal numbers.

use harbor_core::{HarborError, Signal, SignalSpec};

/// Resolve `signal` to the OS signal number to deliver.
pub fn resolve_signal(signal: &Signal) -> Result<i32, HarborError> {
    let invalid = || {
        HarborError::InvalidSignal(match signal {
            Signal::Custom(raw) => raw.trim().to_string(),
            other => other.to_string(),
        })
    };

    let spec = signal.spec().ok_or_else(invalid)?;

    #[cfg(unix)]
    {
        use nix::sys::signal::Signal as OsSignal;

        let resolved = match spec {
            SignalSpec::Named(name) => name.parse::<OsSignal>().map_err(|_| invalid())?,
            SignalSpec::Number(number) => OsSignal::try_from(number).map_err(|_| invalid())?,
        };
        Ok(resolved as i32)
    }

    #[cfg(not(unix))]
    {
        let _ = spec;
        Err(invalid())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn reload_is_sighup_and_terminate_is_sigterm() {
        assert_eq!(
            resolve_signal(&Signal::Reload).unwrap(),
            nix::sys::signal::Signal::SIGHUP as i32
        );
        assert_eq!(
            resolve_signal(&Signal::Terminate).unwrap(),
            nix::sys::signal::Signal::SIGTERM as i32
        );
    }

    #[test]
    fn custom_names_and_numbers_resolve() {
        let usr1 = nix::sys::signal::Signal::SIGUSR1 as i32;
        assert_eq!(resolve_signal(&Signal::Custom("usr1".into())).unwrap(), usr1);
        assert_eq!(resolve_signal(&Signal::Custom("SIGUSR1".into())).unwrap(), usr1);
        assert_eq!(
            resolve_signal(&Signal::Custom(usr1.to_string())).unwrap(),
            usr1
        );
    }

    #[test]
    fn unknown_signals_are_invalid() {
        for raw in ["BOGUS", "", "0", "9999"] {
            match resolve_signal(&Signal::Custom(raw.into())) {
                Err(HarborError::InvalidSignal(shown)) => assert_eq!(shown, raw),
                other => panic!("unexpected outcome for {raw:?}: {other:?}"),
            }
        }
    }
}
