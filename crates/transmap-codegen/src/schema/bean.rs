use super::{BeanAttr, Diagnostics, Field, Position};

/// A struct deriving `Bean`.
#[derive(Debug)]
pub(crate) struct Bean {
    pub(crate) ident: syn::Ident,

    /// Class name in the schema
    pub(crate) name: String,

    pub(crate) fields: Vec<Field>,
}

impl Bean {
    pub(crate) fn from_ast(item: &syn::ItemStruct) -> syn::Result<Bean> {
        if !item.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &item.generics,
                "generic beans are not supported",
            ));
        }

        let syn::Fields::Named(named) = &item.fields else {
            return Err(syn::Error::new_spanned(
                &item.fields,
                "beans must be structs with named fields",
            ));
        };

        let attr = BeanAttr::from_ast(&item.attrs, Position::Struct)?;

        let mut diagnostics = Diagnostics::default();
        let fields: Vec<Field> = named
            .named
            .iter()
            .filter_map(|field| diagnostics.capture(Field::from_ast(field)))
            .collect();

        for (i, field) in fields.iter().enumerate() {
            if field.skip {
                continue;
            }
            if fields[..i].iter().any(|f| !f.skip && f.name == field.name) {
                diagnostics.spanned(
                    &field.ident,
                    format!("duplicate property name `{}`", field.name),
                );
            }
        }

        diagnostics.finish(Bean {
            ident: item.ident.clone(),
            name: attr
                .name
                .map(|name| name.value())
                .unwrap_or_else(|| item.ident.to_string()),
            fields,
        })
    }

    /// Fields that are part of the class, in declaration order.
    pub(crate) fn properties(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| !field.skip)
    }
}
