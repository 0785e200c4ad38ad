/// Unwraps an `Err`, panicking with the `Ok` value otherwise.
///
/// Extra arguments are formatted into the panic message.
#[macro_export]
macro_rules! assert_err {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Err(e) => e,
            Ok(v) => {
                #[allow(unused_mut)]
                let mut msg = format!("expected `Err`; actual=Ok({:?})", v);
                $(
                    msg.push_str(", ");
                    msg.push_str(&format!($($t)*));
                )?
                panic!("{}", msg);
            }
        }
    };
}

/// Unwraps an `Ok`, panicking with the error's message otherwise.
#[macro_export]
macro_rules! assert_ok {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(e) => panic!("expected `Ok`; actual=Err({})", e),
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn unwraps_both_sides() {
        let ok: Result<i32, String> = Ok(1);
        let err: Result<i32, String> = Err("boom".into());

        assert_eq!(assert_ok!(ok), 1);
        assert_eq!(assert_err!(err, "while testing {}", "err"), "boom");
    }

    #[test]
    #[should_panic(expected = "expected `Ok`; actual=Err(boom)")]
    fn ok_reports_error_message() {
        let err: Result<i32, String> = Err("boom".into());
        assert_ok!(err);
    }
}
