use super::{Access, BeanAttr, Position};

#[derive(Debug)]
pub(crate) struct Field {
    pub(crate) ident: syn::Ident,

    /// Property name in the schema
    pub(crate) name: String,

    pub(crate) ty: syn::Type,

    pub(crate) access: Access,

    /// Left out of the class; loaded with `Default::default()`
    pub(crate) skip: bool,
}

impl Field {
    pub(super) fn from_ast(field: &syn::Field) -> syn::Result<Field> {
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "bean fields must be named"));
        };

        let attr = BeanAttr::from_ast(&field.attrs, Position::Field)?;
        let name = match &attr.name {
            Some(name) => name.value(),
            None => ident.to_string().trim_start_matches("r#").to_string(),
        };

        Ok(Field {
            ident: ident.clone(),
            name,
            ty: field.ty.clone(),
            access: attr.access,
            skip: attr.skip,
        })
    }
}
