use proc_macro2::Span;
use quote::ToTokens;
use std::fmt::Display;

/// Errors found while reading a derive input.
///
/// Parsing carries on past the first problem so that one expansion reports
/// every bad attribute and field at once.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    first: Option<syn::Error>,
}

impl Diagnostics {
    pub(crate) fn push(&mut self, err: syn::Error) {
        match &mut self.first {
            Some(first) => first.combine(err),
            None => self.first = Some(err),
        }
    }

    /// Reports `message` at the span of `tokens`.
    pub(crate) fn spanned(&mut self, tokens: impl ToTokens, message: impl Display) {
        self.push(syn::Error::new_spanned(tokens, message));
    }

    pub(crate) fn at(&mut self, span: Span, message: impl Display) {
        self.push(syn::Error::new(span, message));
    }

    /// Keeps the value of `result`, recording its error otherwise.
    pub(crate) fn capture<T>(&mut self, result: syn::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(err);
                None
            }
        }
    }

    /// `value` if nothing was reported, else every reported error.
    pub(crate) fn finish<T>(self, value: T) -> syn::Result<T> {
        match self.first {
            Some(err) => Err(err),
            None => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_problem() {
        let mut diagnostics = Diagnostics::default();
        assert_eq!(diagnostics.capture(Ok::<_, syn::Error>(1)), Some(1));
        diagnostics.at(Span::call_site(), "first");
        diagnostics.capture(Err::<(), _>(syn::Error::new(Span::call_site(), "second")));

        let messages: Vec<_> = match diagnostics.finish(()) {
            Ok(()) => panic!("expected an error"),
            Err(err) => err.into_iter().map(|err| err.to_string()).collect(),
        };
        assert_eq!(messages, ["first", "second"]);
    }

    #[test]
    fn nothing_reported() {
        assert_eq!(Diagnostics::default().finish(7).ok(), Some(7));
    }
}
