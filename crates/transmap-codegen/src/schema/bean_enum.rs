use super::{BeanAttr, Diagnostics, Position};

/// An enum deriving `BeanEnum`.
#[derive(Debug)]
pub(crate) struct BeanEnum {
    pub(crate) ident: syn::Ident,

    /// Enumeration name in the schema
    pub(crate) name: String,

    pub(crate) variants: Vec<Variant>,
}

#[derive(Debug)]
pub(crate) struct Variant {
    pub(crate) ident: syn::Ident,

    /// Constant name in the schema
    pub(crate) name: String,

    /// Text produced when the constant is formatted, if not its name
    pub(crate) display: Option<String>,
}

impl BeanEnum {
    pub(crate) fn from_ast(item: &syn::ItemEnum) -> syn::Result<BeanEnum> {
        if !item.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &item.generics,
                "generic enums are not supported",
            ));
        }

        let attr = BeanAttr::from_ast(&item.attrs, Position::Enum)?;

        let mut diagnostics = Diagnostics::default();
        let mut variants: Vec<Variant> = Vec::with_capacity(item.variants.len());

        for variant in &item.variants {
            if !matches!(variant.fields, syn::Fields::Unit) {
                diagnostics.spanned(variant, "only unit variants are supported");
                continue;
            }

            let Some(attr) =
                diagnostics.capture(BeanAttr::from_ast(&variant.attrs, Position::Variant))
            else {
                continue;
            };

            let name = attr
                .name
                .map(|name| name.value())
                .unwrap_or_else(|| variant.ident.to_string());

            if variants.iter().any(|v| v.name == name) {
                diagnostics.spanned(&variant.ident, format!("duplicate constant name `{name}`"));
                continue;
            }

            variants.push(Variant {
                ident: variant.ident.clone(),
                name,
                display: attr.display.map(|display| display.value()),
            });
        }

        if item.variants.is_empty() {
            diagnostics.spanned(&item.ident, "an enum needs at least one variant");
        }

        diagnostics.finish(BeanEnum {
            ident: item.ident.clone(),
            name: attr
                .name
                .map(|name| name.value())
                .unwrap_or_else(|| item.ident.to_string()),
            variants,
        })
    }
}
