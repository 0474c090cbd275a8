//! ABI model
//!
//! An ABI is the schema document a contract publishes: which structs exist,
//! which struct each action takes as payload, and which tables it stores.
//! The decoder treats it as plain data, so built-in schemas are `Abi` values
//! too.

use serde::{Deserialize, Serialize};

use crate::codec::{ByteWriter, Encode};
use crate::models::name::Name;
use crate::models::transaction::Extension;

/// Upper bound on typedef chains followed by [`Abi::resolve_type`]
const MAX_TYPEDEF_CHAIN: usize = 32;

/// Application binary interface of a contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Abi {
    /// Format version, e.g. `eosio::abi/1.1`
    pub version: String,
    /// Type aliases
    pub types: Vec<TypeDef>,
    pub structs: Vec<StructDef>,
    pub actions: Vec<ActionDef>,
    pub tables: Vec<TableDef>,
    pub ricardian_clauses: Vec<ClausePair>,
    pub error_messages: Vec<ErrorMessage>,
    pub abi_extensions: Vec<Extension>,
    pub variants: Vec<VariantDef>,
    pub action_results: Vec<ActionResultDef>,
}

/// `new_type_name` is an alias for `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub new_type_name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    /// Struct whose fields precede these, empty if none
    pub base: String,
    pub fields: Vec<FieldDef>,
}

/// Binds an action name to its payload type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: Name,
    #[serde(rename = "type")]
    pub ty: String,
    pub ricardian_contract: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: Name,
    pub index_type: String,
    pub key_names: Vec<String>,
    pub key_types: Vec<String>,
    /// Row type
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClausePair {
    pub id: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error_code: u64,
    pub error_msg: String,
}

/// Tagged union: a varuint32 index selects one of `types`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResultDef {
    pub name: Name,
    pub result_type: String,
}

impl Abi {
    /// Create an empty ABI
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            ..Default::default()
        }
    }

    /// Add a struct from `(field, type)` pairs
    pub fn add_struct(&mut self, name: &str, base: &str, fields: &[(&str, &str)]) {
        self.structs.push(StructDef {
            name: name.to_string(),
            base: base.to_string(),
            fields: fields
                .iter()
                .map(|(name, ty)| FieldDef {
                    name: name.to_string(),
                    ty: ty.to_string(),
                })
                .collect(),
        });
    }

    /// Bind an action to its payload struct
    pub fn add_action(&mut self, name: Name, ty: &str) {
        self.actions.push(ActionDef {
            name,
            ty: ty.to_string(),
            ricardian_contract: String::new(),
        });
    }

    pub fn add_type(&mut self, new_type_name: &str, ty: &str) {
        self.types.push(TypeDef {
            new_type_name: new_type_name.to_string(),
            ty: ty.to_string(),
        });
    }

    pub fn add_variant(&mut self, name: &str, types: &[&str]) {
        self.variants.push(VariantDef {
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        });
    }

    pub fn find_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn find_action(&self, name: Name) -> Option<&ActionDef> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn find_variant(&self, name: &str) -> Option<&VariantDef> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn find_typedef(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.new_type_name == name)
    }

    /// Follow typedef aliases until a non-alias is reached.
    ///
    /// Returns `None` if the chain is cyclic or unreasonably long.
    pub fn resolve_type<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        let mut current = name;
        for _ in 0..MAX_TYPEDEF_CHAIN {
            match self.find_typedef(current) {
                Some(def) => current = &def.ty,
                None => return Some(current),
            }
        }
        None
    }

    /// Struct type used as payload of `action`, if declared
    pub fn action_type(&self, action: Name) -> Option<&str> {
        self.find_action(action).map(|a| a.ty.as_str())
    }
}

impl Encode for Abi {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_string(&self.version);

        writer.write_length(self.types.len());
        for t in &self.types {
            writer.write_string(&t.new_type_name);
            writer.write_string(&t.ty);
        }

        writer.write_length(self.structs.len());
        for s in &self.structs {
            writer.write_string(&s.name);
            writer.write_string(&s.base);
            writer.write_length(s.fields.len());
            for f in &s.fields {
                writer.write_string(&f.name);
                writer.write_string(&f.ty);
            }
        }

        writer.write_length(self.actions.len());
        for a in &self.actions {
            a.name.encode(writer);
            writer.write_string(&a.ty);
            writer.write_string(&a.ricardian_contract);
        }

        writer.write_length(self.tables.len());
        for t in &self.tables {
            t.name.encode(writer);
            writer.write_string(&t.index_type);
            t.key_names.encode(writer);
            t.key_types.encode(writer);
            writer.write_string(&t.ty);
        }

        writer.write_length(self.ricardian_clauses.len());
        for c in &self.ricardian_clauses {
            writer.write_string(&c.id);
            writer.write_string(&c.body);
        }

        writer.write_length(self.error_messages.len());
        for e in &self.error_messages {
            writer.write_u64(e.error_code);
            writer.write_string(&e.error_msg);
        }

        self.abi_extensions.encode(writer);

        // Binary extensions: written only when something needs them
        if self.variants.is_empty() && self.action_results.is_empty() {
            return;
        }
        writer.write_length(self.variants.len());
        for v in &self.variants {
            writer.write_string(&v.name);
            v.types.encode(writer);
        }

        if self.action_results.is_empty() {
            return;
        }
        writer.write_length(self.action_results.len());
        for r in &self.action_results {
            r.name.encode(writer);
            writer.write_string(&r.result_type);
        }
    }
}
