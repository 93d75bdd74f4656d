//! Artifact emitters.
//!
//! Three artifact kinds share one writer:
//! - implementation class: `export class PostImpl implements _Post { ... }`
//! - factory function: `export function createPost(init: _Post): _Post`
//! - view interfaces: `export interface PostProfile { ... }`, one per view
//!
//! Output is block-formatted with four-space indentation; inline object
//! composites stay on the member line. Field order is whatever the resolver
//! produced, which follows the target's declared order.

use tsgen_common::GeneratorOptions;
use tsgen_resolve::{FieldDescriptor, ResolvedShape, ResolvedView, ViewBatch};

use crate::naming;
use crate::writer::ArtifactWriter;

/// Renders resolved shapes as TypeScript source text.
pub struct ArtifactEmitter<'a> {
    options: &'a GeneratorOptions,
    writer: ArtifactWriter,
}

impl<'a> ArtifactEmitter<'a> {
    pub fn new(options: &'a GeneratorOptions) -> ArtifactEmitter<'a> {
        ArtifactEmitter {
            options,
            writer: ArtifactWriter::new(),
        }
    }

    /// Emit an implementation class for the resolved shape.
    ///
    /// Every field is assigned from the init object unconditionally; the
    /// init value is the authority even for optional members.
    pub fn emit_class(&mut self, shape: &ResolvedShape) -> String {
        self.writer.reset();
        let name = naming::class_name(&shape.name, self.options);

        self.writer.write("export class ");
        self.writer.write(&name);
        self.writer.write(" implements ");
        self.writer.write(&shape.name);
        self.writer.write(" {");
        self.writer.write_line();
        self.writer.increase_indent();

        for field in &shape.fields {
            self.emit_member_line(field);
        }
        self.writer.write_line();

        self.writer.write_indent();
        self.writer.write("constructor(init: ");
        self.writer.write(&shape.name);
        self.writer.write(") {");
        self.writer.write_line();
        self.writer.increase_indent();
        for field in &shape.fields {
            self.writer.write_indent();
            self.writer.write(&member_access("this", &field.name));
            self.writer.write(" = ");
            self.writer.write(&member_access("init", &field.name));
            self.writer.write(";");
            self.writer.write_line();
        }
        self.writer.decrease_indent();
        self.writer.write_indent();
        self.writer.write("}");
        self.writer.write_line();

        self.writer.decrease_indent();
        self.writer.write_indent();
        self.writer.write("}");
        self.writer.write_line();
        self.writer.take_output()
    }

    /// Emit a factory function returning an object literal of the target type.
    pub fn emit_factory(&mut self, shape: &ResolvedShape) -> String {
        self.writer.reset();
        let name = naming::factory_name(&shape.name, self.options);

        self.writer.write("export function ");
        self.writer.write(&name);
        self.writer.write("(init: ");
        self.writer.write(&shape.name);
        self.writer.write("): ");
        self.writer.write(&shape.name);
        self.writer.write(" {");
        self.writer.write_line();
        self.writer.increase_indent();

        self.writer.write_indent();
        self.writer.write("return {");
        self.writer.write_line();
        self.writer.increase_indent();
        for field in &shape.fields {
            self.writer.write_indent();
            self.writer.write(&property_key(&field.name));
            self.writer.write(": ");
            self.writer.write(&member_access("init", &field.name));
            self.writer.write(",");
            self.writer.write_line();
        }
        self.writer.decrease_indent();
        self.writer.write_indent();
        self.writer.write("};");
        self.writer.write_line();

        self.writer.decrease_indent();
        self.writer.write_indent();
        self.writer.write("}");
        self.writer.write_line();
        self.writer.take_output()
    }

    /// Emit one interface per resolved view, blank-line separated.
    ///
    /// A batch whose views were all skipped produces an empty string; the
    /// caller decides how to report that.
    pub fn emit_views(&mut self, batch: &ViewBatch) -> String {
        self.writer.reset();
        for (index, view) in batch.views.iter().enumerate() {
            if index > 0 {
                self.writer.write_line();
            }
            self.emit_view_interface(&batch.target, view);
        }
        self.writer.take_output()
    }

    fn emit_view_interface(&mut self, target: &str, view: &ResolvedView) {
        let name = naming::view_interface_name(target, &view.key, self.options);
        self.writer.write("export interface ");
        self.writer.write(&name);
        self.writer.write(" {");
        self.writer.write_line();
        self.writer.increase_indent();
        for field in &view.fields {
            self.emit_member_line(field);
        }
        self.writer.decrease_indent();
        self.writer.write_indent();
        self.writer.write("}");
        self.writer.write_line();
    }

    fn emit_member_line(&mut self, field: &FieldDescriptor) {
        self.writer.write_indent();
        self.writer.write(&property_key(&field.name));
        if field.is_optional {
            self.writer.write("?");
        }
        self.writer.write(": ");
        self.writer.write(&field.type_text);
        self.writer.write(";");
        self.writer.write_line();
    }
}

/// Render a property key, quoting names that are not identifier-shaped.
fn property_key(name: &str) -> String {
    if is_identifier_name(name) {
        name.to_string()
    } else {
        format!("'{}'", escape_single_quoted(name))
    }
}

/// Render `base.name`, switching to bracket access for quoted keys.
fn member_access(base: &str, name: &str) -> String {
    if is_identifier_name(name) {
        format!("{base}.{name}")
    } else {
        format!("{base}['{}']", escape_single_quoted(name))
    }
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(ch) if ch == '_' || ch == '$' || ch.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch == '_' || ch == '$' || ch.is_alphanumeric())
}

fn escape_single_quoted(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_shape() -> ResolvedShape {
        ResolvedShape {
            name: "_Post".to_string(),
            fields: vec![
                FieldDescriptor::new("id", "string", false),
                FieldDescriptor::new("title", "string", false),
                FieldDescriptor::new("text", "string", false),
                FieldDescriptor::new("images", "string[]", false),
                FieldDescriptor::new("author", "{ id: string; name: string }", false),
            ],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_profile_view_matches_target_order() {
        let options = GeneratorOptions::default();
        let batch = ViewBatch {
            target: "_Post".to_string(),
            views: vec![ResolvedView {
                key: "profile".to_string(),
                fields: vec![
                    FieldDescriptor::new("id", "string", false),
                    FieldDescriptor::new("title", "string", false),
                    FieldDescriptor::new("text", "string", false),
                    FieldDescriptor::new("images", "string[]", false),
                    FieldDescriptor::new("author", "{ name: string }", false),
                ],
            }],
            warnings: Vec::new(),
        };

        let output = ArtifactEmitter::new(&options).emit_views(&batch);
        let expected = concat!(
            "export interface PostProfile {\n",
            "    id: string;\n",
            "    title: string;\n",
            "    text: string;\n",
            "    images: string[];\n",
            "    author: { name: string };\n",
            "}\n",
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_class_assigns_every_field_from_init() {
        let options = GeneratorOptions::default();
        let shape = ResolvedShape {
            name: "_Account".to_string(),
            fields: vec![
                FieldDescriptor::new("id", "string", false),
                FieldDescriptor::new("email", "string", true),
            ],
            warnings: Vec::new(),
        };

        let output = ArtifactEmitter::new(&options).emit_class(&shape);
        let expected = concat!(
            "export class AccountImpl implements _Account {\n",
            "    id: string;\n",
            "    email?: string;\n",
            "\n",
            "    constructor(init: _Account) {\n",
            "        this.id = init.id;\n",
            "        this.email = init.email;\n",
            "    }\n",
            "}\n",
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_factory_returns_object_literal() {
        let options = GeneratorOptions::default();
        let output = ArtifactEmitter::new(&options).emit_factory(&post_shape());
        let expected = concat!(
            "export function createPost(init: _Post): _Post {\n",
            "    return {\n",
            "        id: init.id,\n",
            "        title: init.title,\n",
            "        text: init.text,\n",
            "        images: init.images,\n",
            "        author: init.author,\n",
            "    };\n",
            "}\n",
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_views_are_blank_line_separated() {
        let options = GeneratorOptions::default();
        let batch = ViewBatch {
            target: "Post".to_string(),
            views: vec![
                ResolvedView {
                    key: "card".to_string(),
                    fields: vec![FieldDescriptor::new("id", "string", false)],
                },
                ResolvedView {
                    key: "detail".to_string(),
                    fields: vec![FieldDescriptor::new("title", "string", false)],
                },
            ],
            warnings: Vec::new(),
        };

        let output = ArtifactEmitter::new(&options).emit_views(&batch);
        assert_eq!(
            output,
            concat!(
                "export interface PostCard {\n",
                "    id: string;\n",
                "}\n",
                "\n",
                "export interface PostDetail {\n",
                "    title: string;\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_empty_batch_emits_nothing() {
        let options = GeneratorOptions::default();
        let batch = ViewBatch {
            target: "Post".to_string(),
            views: Vec::new(),
            warnings: Vec::new(),
        };
        assert_eq!(ArtifactEmitter::new(&options).emit_views(&batch), "");
    }

    #[test]
    fn test_quoted_keys_use_bracket_access() {
        let options = GeneratorOptions::default();
        let shape = ResolvedShape {
            name: "Config".to_string(),
            fields: vec![
                FieldDescriptor::new("display-name", "string", false),
                FieldDescriptor::new("plain", "number", false),
            ],
            warnings: Vec::new(),
        };

        let class_output = ArtifactEmitter::new(&options).emit_class(&shape);
        assert!(
            class_output.contains("'display-name': string;"),
            "Expected quoted member: {class_output}"
        );
        assert!(
            class_output.contains("this['display-name'] = init['display-name'];"),
            "Expected bracket assignment: {class_output}"
        );

        let factory_output = ArtifactEmitter::new(&options).emit_factory(&shape);
        assert!(
            factory_output.contains("'display-name': init['display-name'],"),
            "Expected bracket access in literal: {factory_output}"
        );
        assert!(
            factory_output.contains("plain: init.plain,"),
            "Expected plain access untouched: {factory_output}"
        );
    }

    #[test]
    fn test_interface_suffix_lands_after_view_key() {
        let options = GeneratorOptions {
            interface_suffix: "View".to_string(),
            ..GeneratorOptions::default()
        };
        let batch = ViewBatch {
            target: "_Post".to_string(),
            views: vec![ResolvedView {
                key: "profile".to_string(),
                fields: vec![FieldDescriptor::new("id", "string", false)],
            }],
            warnings: Vec::new(),
        };

        let output = ArtifactEmitter::new(&options).emit_views(&batch);
        assert!(
            output.starts_with("export interface PostProfileView {"),
            "Expected suffixed name: {output}"
        );
    }
}
