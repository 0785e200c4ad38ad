mod attr;
pub(crate) use attr::{Access, BeanAttr, Position};

mod bean;
pub(crate) use bean::Bean;

mod bean_enum;
pub(crate) use bean_enum::BeanEnum;

mod diagnostics;
pub(crate) use diagnostics::Diagnostics;

mod field;
pub(crate) use field::Field;
