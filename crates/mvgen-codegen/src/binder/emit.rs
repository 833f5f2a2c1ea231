//! C# text for a binder declaration.

use super::declaration::BinderDeclaration;
use super::{adapter_method_name, binding_command_field_name, binding_field_name, converter_field_name};
use crate::constants::{
    generated_code, AUTO_GENERATED_HEADER, BINDER_GENERATOR, BINDING_COMMAND, BINDING_PROPERTY, CONVERTER,
    EXCLUDE_COVERAGE, HIDE_IN_INSPECTOR, IBINDING_CONTEXT, SERIALIZE_FIELD, UNION_CONVERTER, UNION_TYPE,
};
use crate::generator::GeneratedSource;
use crate::model::{AttributeInfo, BindingCommandRef, BindingPropertyRef};
use crate::output::hint_name;
use crate::printer::Printer;

impl BinderDeclaration<'_> {
    pub fn generate_source(&self) -> GeneratedSource {
        GeneratedSource {
            hint_name: hint_name(&self.full_name, "__BinderGenerator"),
            text: self.write_code(),
        }
    }

    /// The partial class completing this binder.
    pub fn write_code(&self) -> String {
        let mut p = Printer::new();
        p.print_block(AUTO_GENERATED_HEADER);
        p.print_empty_line();

        // Inside the namespace, so usings written there resolve the same way.
        if let Some(namespace) = &self.syntax.scope.namespace {
            p.print_line(format!("namespace {namespace}"));
            p.open_scope();
        }
        for using in &self.syntax.scope.usings {
            p.print_line(format!("using {using};"));
        }
        if !self.syntax.scope.usings.is_empty() {
            p.print_empty_line();
        }
        for outer in &self.syntax.scope.containing_types {
            p.print_line(type_header(outer.keyword.as_str(), &outer.name, &outer.type_parameters));
            p.open_scope();
        }

        p.print_line(type_header(self.syntax.keyword.as_str(), &self.syntax.name, &self.syntax.type_parameters));
        p.open_scope();
        self.write_members(&mut p);
        p.close_scope();

        for _ in &self.syntax.scope.containing_types {
            p.close_scope();
        }
        if self.syntax.scope.namespace.is_some() {
            p.close_scope();
        }

        p.into_string()
    }

    fn write_members(&self, p: &mut Printer) {
        let generated = generated_code(BINDER_GENERATOR);

        for property in &self.binding_property_refs {
            if !property.skip_binding_property {
                self.write_field(
                    p,
                    &generated,
                    BINDING_PROPERTY,
                    &binding_field_name(&property.method.name),
                    &property.forwarded_field_attributes,
                    false,
                );
            }
            if !property.skip_converter {
                self.write_field(p, &generated, CONVERTER, &converter_field_name(&property.method.name), &[], true);
            }
        }

        for command in &self.binding_command_refs {
            if !command.skip_binding_command {
                self.write_field(
                    p,
                    &generated,
                    BINDING_COMMAND,
                    &binding_command_field_name(&command.method.name),
                    &command.forwarded_field_attributes,
                    false,
                );
            }
        }

        if !self.non_union_types.is_empty() {
            p.print_line(&generated);
            p.print_line("private static readonly global::System.Type[] s_bindingPropertyTypes = new global::System.Type[]");
            p.open_scope();
            for name in self.non_union_types.keys() {
                p.print_line(format!("typeof({name}),"));
            }
            p.close_scope_with(";");
            p.print_empty_line();
        }

        for property in &self.binding_property_refs {
            write_adapter(p, &generated, property);
        }

        for command in &self.binding_command_refs {
            write_command(p, &generated, command);
        }

        self.write_bind_members(p, &generated);
    }

    fn write_field(
        &self,
        p: &mut Printer,
        generated: &str,
        ty: &str,
        name: &str,
        forwarded: &[AttributeInfo],
        hidden: bool,
    ) {
        p.print_line(generated);
        if self.references_ui_framework {
            p.print_line(SERIALIZE_FIELD);
            if hidden {
                p.print_line(HIDE_IN_INSPECTOR);
            }
        }
        for attribute in forwarded {
            p.print_line(attribute.to_source());
        }
        p.print_line(format!("private {ty} {name} = new {ty}();"));
        p.print_empty_line();
    }

    fn write_bind_members(&self, p: &mut Printer, generated: &str) {
        p.print_line(generated);
        p.print_line(EXCLUDE_COVERAGE);
        if self.is_base_binder {
            p.print_line(format!("public override void BindMembers({IBINDING_CONTEXT} context)"));
        } else {
            p.print_line(format!("public virtual void BindMembers({IBINDING_CONTEXT} context)"));
        }
        p.open_scope();

        if self.is_base_binder {
            p.print_line("base.BindMembers(context);");
            if !self.binding_property_refs.is_empty() || !self.binding_command_refs.is_empty() {
                p.print_empty_line();
            }
        }

        for property in &self.binding_property_refs {
            p.print_line(format!(
                "context.BindProperty(this.{}, this.{});",
                binding_field_name(&property.method.name),
                adapter_method_name(&property.method.name),
            ));
        }
        for command in &self.binding_command_refs {
            p.print_line(format!(
                "context.BindCommand(this.{});",
                binding_command_field_name(&command.method.name),
            ));
        }

        p.close_scope();
    }
}

fn type_header(keyword: &str, name: &str, type_parameters: &[String]) -> String {
    if type_parameters.is_empty() {
        format!("partial {keyword} {name}")
    } else {
        format!("partial {keyword} {name}<{}>", type_parameters.join(", "))
    }
}

/// Receives a union from the binding and forwards the converted value.
fn write_adapter(p: &mut Printer, generated: &str, property: &BindingPropertyRef) {
    let method = &property.method.name;
    let prefix = property.parameter.ref_kind.prefix();
    let converter = converter_field_name(method);

    p.print_line(generated);
    p.print_line(format!("private void {}(in {UNION_TYPE} union)", adapter_method_name(method)));
    p.open_scope();
    if property.is_parameter_not_union {
        p.print_line(format!("var converted = this.{converter}.Convert(union);"));
        p.print_empty_line();
        p.print_line(format!("if (converted.TryGetValue(out {} value))", property.parameter_type));
        p.open_scope();
        p.print_line(format!("{method}({prefix}value);"));
        p.close_scope();
    } else {
        p.print_line(format!("var value = this.{converter}.Convert(union);"));
        p.print_line(format!("{method}({prefix}value);"));
    }
    p.close_scope();
    p.print_empty_line();
}

/// Implementation of a partial command method.
fn write_command(p: &mut Printer, generated: &str, command: &BindingCommandRef) {
    let method = &command.method;
    let field = binding_command_field_name(&method.name);
    let access = if method.has_explicit_accessibility {
        format!("{} ", method.accessibility.keyword())
    } else {
        String::new()
    };

    p.print_line(generated);
    match (&command.parameter, &command.parameter_type) {
        (Some(parameter), Some(ty)) => {
            p.print_line(format!(
                "{access}partial void {}({}{ty} {})",
                method.name,
                parameter.ref_kind.prefix(),
                parameter.name,
            ));
            p.open_scope();
            if ty == UNION_TYPE {
                p.print_line(format!("this.{field}.Invoke({});", parameter.name));
            } else {
                p.print_line(format!("this.{field}.Invoke({UNION_CONVERTER}.ToUnion({}));", parameter.name));
            }
            p.close_scope();
        }
        _ => {
            p.print_line(format!("{access}partial void {}()", method.name));
            p.open_scope();
            p.print_line(format!("this.{field}.Invoke();"));
            p.close_scope();
        }
    }
    p.print_empty_line();
}
