pub mod conforms;
pub mod declarations;
pub mod ext;
pub mod extension;
pub mod identify;
pub mod tag;
