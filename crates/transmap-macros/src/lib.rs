extern crate proc_macro;

use proc_macro::TokenStream;

/// Declares a struct as a class: implements `Bean` and `Mappable`.
///
/// Options, all under `#[bean(...)]`:
///
/// * on the struct, `name = "..."` sets the class name;
/// * on a field, `rename = "..."` sets the property name, `read_only` or
///   `write_only` restricts access, and `skip` leaves the field out of the
///   class (it loads as `Default::default()`).
#[proc_macro_derive(Bean, attributes(bean))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    match transmap_codegen::generate_bean(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Declares a unit-only enum as an enumeration: implements `BeanEnum` and
/// `Mappable`.
///
/// `#[bean(name = "...")]` on the enum sets its name; on a variant,
/// `rename = "..."` sets the constant name and `display = "..."` the text
/// the constant formats to.
#[proc_macro_derive(BeanEnum, attributes(bean))]
pub fn derive_bean_enum(input: TokenStream) -> TokenStream {
    match transmap_codegen::generate_bean_enum(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
