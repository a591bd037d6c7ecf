//! OpenAPI Schema Scanner - OpenAPI component schemas from indexed class metadata.
//!
//! Given a read-only index of class records (fields, accessors, generics,
//! inheritance and annotations), this library walks the data object graph of
//! any root type and produces a normalized schema tree. Shared types are
//! registered once as component schemas and referenced through `$ref`, which
//! also resolves recursive and mutually recursive classes.
//!
//! # Architecture
//!
//! 1. [`index`] - Class records, the type model and built-in JDK knowledge
//! 2. [`classifier`] - Maps types to their schema type and format
//! 3. [`registry`] - Component names and bodies for one scan
//! 4. [`property_resolver`] - Exposed properties of a class, with generics resolved
//! 5. [`constraints`] - Bean validation and JSON binding rules
//! 6. [`schema_reader`] - Reads `@Schema` annotations into schemas
//! 7. [`schema_generator`] - The graph walker
//! 8. [`openapi_builder`] - Collects the results into an OpenAPI document
//! 9. [`scanner`], [`parser`], [`serializer`], [`cli`] - The command-line shell
//!
//! # Example Usage
//!
//! ```
//! use openapi_schema_scanner::{
//!     config::ScanConfig,
//!     index::{ClassIndex, ClassInfo, FieldInfo, Type},
//!     openapi_builder::OpenApiBuilder,
//!     schema::Schema,
//! };
//!
//! let mut node = ClassInfo::new("com.acme.Node");
//! node.fields.push(FieldInfo::new("next", Type::class("com.acme.Node")));
//! let index = ClassIndex::new(vec![node]);
//!
//! let mut builder = OpenApiBuilder::new();
//! builder
//!     .scan(&index, &ScanConfig::default(), &[Type::class("com.acme.Node")])
//!     .unwrap();
//! let document = builder.build();
//!
//! assert_eq!(document.roots["com.acme.Node"], Schema::reference("Node"));
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod annotations;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod constraints;
pub mod context;
pub mod error;
pub mod extension;
pub mod index;
pub mod naming;
pub mod openapi_builder;
pub mod parser;
pub mod property_resolver;
pub mod registry;
pub mod scanner;
pub mod schema;
pub mod schema_generator;
pub mod schema_reader;
pub mod serializer;
pub mod visibility;
