pub mod temp_document_store;

pub use temp_document_store::LocalTempDocumentStore;
