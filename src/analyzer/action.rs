//! Per-action schema resolution and sub-reports

use log::{debug, info, warn};
use std::rc::Rc;

use super::report::ReportWriter;
use super::Analyzer;
use crate::cache::AbiCache;
use crate::constants::known_contracts::{builtin_abi, system_abi};
use crate::constants::CODE_MARKERS;
use crate::decoder::{self, DecodedPayload};
use crate::errors::DecodeResult;
use crate::interpreter;
use crate::models::abi::Abi;
use crate::models::system::{SetAbi, SetCode, SystemAction};
use crate::models::transaction::Action;
use crate::models::value::Value;
use crate::utils::hash::sha256_hex;
use crate::utils::pattern::marker_hits;

const INDENT: usize = 2;

/// Where a contract action's schema comes from
#[derive(Debug, Clone)]
pub enum SchemaSource {
    /// Installed by a `setabi` earlier in the same transaction
    Installed(Rc<Abi>),
    /// Shipped with the analyzer for a well-known contract
    Builtin(&'static Abi),
}

impl SchemaSource {
    pub fn abi(&self) -> &Abi {
        match self {
            SchemaSource::Installed(abi) => abi.as_ref(),
            SchemaSource::Builtin(abi) => *abi,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SchemaSource::Installed(_) => "installed",
            SchemaSource::Builtin(_) => "built-in",
        }
    }
}

/// How an action's payload is reported
#[derive(Debug, Clone)]
pub enum ActionKind {
    SetCode,
    SetAbi,
    Contract { source: SchemaSource, struct_type: String },
    Opaque,
}

impl ActionKind {
    /// Resolve the kind of `action`.
    ///
    /// System `setcode`/`setabi` always win. Otherwise an ABI installed in
    /// this pass is preferred over a built-in one; an account neither knows
    /// about is opaque.
    pub fn resolve(action: &Action, cache: &AbiCache) -> Self {
        match SystemAction::recognize(action.account, action.name) {
            Some(SystemAction::SetCode) => return ActionKind::SetCode,
            Some(SystemAction::SetAbi) => return ActionKind::SetAbi,
            None => {}
        }

        let installed = cache.get(action.account).map(SchemaSource::Installed);
        let builtin = builtin_abi(action.account).map(SchemaSource::Builtin);
        for source in installed.into_iter().chain(builtin) {
            if let Some(ty) = source.abi().action_type(action.name) {
                debug!(
                    "Resolved {}::{} to `{}` via {} ABI",
                    action.account,
                    action.name,
                    ty,
                    source.label()
                );
                let struct_type = ty.to_string();
                return ActionKind::Contract { source, struct_type };
            }
        }

        debug!("No schema for {}::{}", action.account, action.name);
        ActionKind::Opaque
    }
}

impl Analyzer {
    pub(super) fn report_action(&mut self, index: usize, action: &Action) {
        let authorization = if action.authorization.is_empty() {
            "(none)".to_string()
        } else {
            action.authorization_list()
        };
        self.writer.line(format_args!(
            "{}. Action {}::{}, authorized by: {}",
            index + 1,
            action.account,
            action.name,
            authorization
        ));

        match ActionKind::resolve(action, &self.cache) {
            ActionKind::SetCode => self.report_setcode(action),
            ActionKind::SetAbi => self.report_setabi(action),
            ActionKind::Contract { source, struct_type } => self.report_contract(action, &source, &struct_type),
            ActionKind::Opaque => self.report_opaque(action),
        }
        self.writer.blank();
    }

    /// Decode a system payload, noting any failure or leftover bytes.
    fn decode_system<T>(
        &mut self,
        action: &Action,
        kind: SystemAction,
        lift: fn(&Value) -> DecodeResult<T>,
    ) -> Option<T> {
        let result = decoder::decode(&action.data, system_abi(), kind.struct_type())
            .and_then(|payload| lift(&payload.value).map(|lifted| (lifted, payload.trailing)));
        match result {
            Ok((lifted, trailing)) => {
                self.note_trailing(trailing);
                Some(lifted)
            }
            Err(e) => {
                warn!("Failed to decode {}::{} payload: {}", action.account, action.name, e);
                self.writer.line(format_args!(
                    "Could not decode the `{}` payload ({}): {}",
                    kind.struct_type(),
                    e.class(),
                    e
                ));
                self.writer.verbose_dump(&action.data);
                None
            }
        }
    }

    fn report_setcode(&mut self, action: &Action) {
        let Some(setcode) = self.decode_system(action, SystemAction::SetCode, SetCode::from_value) else {
            return;
        };

        self.writer.line(format_args!("Set code for account: {}", setcode.account));
        self.writer
            .line(format_args!("VM type/version: {}/{}", setcode.vm_type, setcode.vm_version));
        self.writer.line(format_args!("Code size: {} bytes", setcode.code.len()));
        self.writer.line(format_args!("Code's SHA256: {}", sha256_hex(&setcode.code)));
        self.writer.line(format_args!("Marker checks (advisory heuristic, not proof of target chain):"));
        for (marker, found) in marker_hits(&setcode.code, CODE_MARKERS) {
            self.writer.line(format_args!(
                "  Contains the string '{}': {}",
                String::from_utf8_lossy(marker),
                found
            ));
        }
        self.writer.verbose_dump(&setcode.code);
    }

    fn report_setabi(&mut self, action: &Action) {
        let Some(setabi) = self.decode_system(action, SystemAction::SetAbi, SetAbi::from_value) else {
            return;
        };

        self.writer.line(format_args!("Set ABI for account: {}", setabi.account));
        let (abi, trailing) = match interpreter::interpret_document(&setabi.abi) {
            Ok(document) => (document.abi, document.trailing),
            Err(e) => {
                warn!("Could not decode ABI for {}: {}", setabi.account, e);
                self.writer.line(format_args!(
                    "Could not decode the ABI ({}, {} bytes): {}",
                    e.class(),
                    setabi.abi.len(),
                    e
                ));
                self.writer.verbose_dump(&setabi.abi);
                return;
            }
        };

        self.writer.line(format_args!("ABI version: {}", abi.version));
        self.writer.line(format_args!("{}", abi_summary(&abi)));
        write_abi_listing(&mut self.writer, &abi);
        self.note_trailing(trailing);

        let undefined = decoder::undefined_types(&abi);
        if !undefined.is_empty() {
            self.writer.line(format_args!(
                "Note: undefined types referenced (schema error when reached): {}",
                undefined.join(", ")
            ));
        }

        if self.writer.is_verbose() {
            match serde_json::to_string_pretty(&abi) {
                Ok(json) => self
                    .writer
                    .verbose_line(format_args!("JSON representation of the ABI:\n{}", json)),
                Err(e) => self
                    .writer
                    .verbose_line(format_args!("Couldn't serialize ABI into JSON: {}", e)),
            }
        }

        info!("Installing ABI for {} ({} actions)", setabi.account, abi.actions.len());
        self.cache.insert(setabi.account, abi);
    }

    fn report_contract(&mut self, action: &Action, source: &SchemaSource, struct_type: &str) {
        match decoder::decode(&action.data, source.abi(), struct_type) {
            Ok(DecodedPayload { value, trailing, .. }) => {
                self.writer.line(format_args!(
                    "Data decoded as `{}` ({} ABI of {}):",
                    struct_type,
                    source.label(),
                    action.account
                ));
                write_value_tree(&mut self.writer, &value, INDENT);
                self.note_trailing(trailing);
            }
            Err(e) => {
                warn!("Failed to decode {}::{} as `{}`: {}", action.account, action.name, struct_type, e);
                self.writer.line(format_args!(
                    "Could not decode the data as `{}` ({}): {}",
                    struct_type,
                    e.class(),
                    e
                ));
                self.writer.line(format_args!(
                    "Raw data: {} bytes, SHA256: {}",
                    action.data.len(),
                    sha256_hex(&action.data)
                ));
                self.writer.verbose_dump(&action.data);
            }
        }
    }

    fn report_opaque(&mut self, action: &Action) {
        self.writer.line(format_args!(
            "No schema known for this action; data: {} bytes, SHA256: {}",
            action.data.len(),
            sha256_hex(&action.data)
        ));
        self.writer.verbose_dump(&action.data);
    }

    fn note_trailing(&mut self, trailing: usize) {
        if trailing > 0 {
            self.writer
                .line(format_args!("Note: {} trailing bytes after the decoded data", trailing));
        }
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// One-line count summary, e.g. `0 types, 2 structs, 1 action, ...`
pub fn abi_summary(abi: &Abi) -> String {
    [
        plural(abi.types.len(), "type", "types"),
        plural(abi.structs.len(), "struct", "structs"),
        plural(abi.actions.len(), "action", "actions"),
        plural(abi.tables.len(), "table", "tables"),
        plural(abi.ricardian_clauses.len(), "ricardian clause", "ricardian clauses"),
        plural(abi.variants.len(), "variant", "variants"),
    ]
    .join(", ")
}

fn write_abi_listing(writer: &mut ReportWriter, abi: &Abi) {
    let pad = " ".repeat(INDENT);
    if !abi.structs.is_empty() {
        writer.line(format_args!("Structs:"));
        for s in &abi.structs {
            let fields: Vec<String> = s.fields.iter().map(|f| format!("{}: {}", f.name, f.ty)).collect();
            if s.base.is_empty() {
                writer.line(format_args!("{}{} {{ {} }}", pad, s.name, fields.join(", ")));
            } else {
                writer.line(format_args!("{}{} : {} {{ {} }}", pad, s.name, s.base, fields.join(", ")));
            }
        }
    }
    if !abi.actions.is_empty() {
        writer.line(format_args!("Actions:"));
        for a in &abi.actions {
            writer.line(format_args!("{}{} -> {}", pad, a.name, a.ty));
        }
    }
    if !abi.tables.is_empty() {
        writer.line(format_args!("Tables:"));
        for t in &abi.tables {
            writer.line(format_args!("{}{} -> {} (index: {})", pad, t.name, t.ty, t.index_type));
        }
    }
}

/// Indented rendering of a decoded value; structs open a nested block
pub fn write_value_tree(writer: &mut ReportWriter, value: &Value, indent: usize) {
    match value {
        Value::Struct(fields) => {
            for (name, field) in fields {
                write_named_value(writer, name, field, indent);
            }
        }
        other => write_named_value(writer, "value", other, indent),
    }
}

fn write_named_value(writer: &mut ReportWriter, name: &str, value: &Value, indent: usize) {
    let pad = " ".repeat(indent);
    if value.is_scalar() {
        writer.line(format_args!("{}{}: {}", pad, name, value));
        return;
    }
    match value {
        Value::Struct(fields) => {
            writer.line(format_args!("{}{}:", pad, name));
            for (field_name, field) in fields {
                write_named_value(writer, field_name, field, indent + INDENT);
            }
        }
        Value::Array(items) => {
            writer.line(format_args!("{}{}: {} items", pad, name, items.len()));
            for (i, item) in items.iter().enumerate() {
                write_named_value(writer, &format!("[{}]", i), item, indent + INDENT);
            }
        }
        Value::Optional(Some(inner)) => write_named_value(writer, name, inner, indent),
        Value::Variant { type_name, value } => {
            write_named_value(writer, &format!("{} <{}>", name, type_name), value, indent)
        }
        other => writer.line(format_args!("{}{}: {}", pad, name, other)),
    }
}
