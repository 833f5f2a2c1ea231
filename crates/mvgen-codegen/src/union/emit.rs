//! C# text for the synthesized unions and their registry.

use super::declaration::{InternalUnionDeclaration, UnionType};
use crate::constants::{
    generated_code, AUTO_GENERATED_HEADER, EXCLUDE_COVERAGE, IUNION_CONVERTER_T, UNION_CONVERTER, UNION_GENERATOR,
    UNION_TYPE,
};
use crate::generator::GeneratedSource;
use crate::output::{hint_name, identifier};
use crate::printer::Printer;

/// Namespace holding every synthesized union.
pub const UNIONS_NAMESPACE: &str = "ZBase.Foundation.Mvvm.Unions.__Internal";

const STRUCT_LAYOUT_EXPLICIT: &str = "[global::System.Runtime.InteropServices.StructLayout(global::System.Runtime.InteropServices.LayoutKind.Explicit)]";
const META_OFFSET: &str = "[global::System.Runtime.InteropServices.FieldOffset(global::ZBase.Foundation.Mvvm.Unions.UnionBase.META_OFFSET)]";
const DATA_OFFSET: &str = "[global::System.Runtime.InteropServices.FieldOffset(global::ZBase.Foundation.Mvvm.Unions.UnionBase.DATA_OFFSET)]";

impl InternalUnionDeclaration {
    /// One explicit-layout union per value type.
    pub fn generate_unions_for_value_types(&self) -> Vec<GeneratedSource> {
        self.value_types
            .iter()
            .map(|ty| unit(ty, write_value_union(ty)))
            .collect()
    }

    /// One wrapper union per reference type.
    pub fn generate_unions_for_ref_types(&self) -> Vec<GeneratedSource> {
        self.ref_types
            .iter()
            .map(|ty| unit(ty, write_ref_union(ty)))
            .collect()
    }

    /// The registry class registering every generated converter, if any.
    pub fn generate_static_class(&self) -> Option<GeneratedSource> {
        if self.is_empty() {
            return None;
        }
        Some(GeneratedSource {
            hint_name: hint_name(&self.assembly_name, "__UnionRegistry"),
            text: self.write_registry(),
        })
    }

    fn write_registry(&self) -> String {
        let generated = generated_code(UNION_GENERATOR);
        let mut p = begin_unit();

        p.print_line(&generated);
        p.print_line(EXCLUDE_COVERAGE);
        p.print_line(format!("internal static partial class UnionRegistry__{}", identifier(&self.assembly_name)));
        p.open_scope();

        p.print_line("[Preserve]");
        if self.references_ui_framework {
            p.print_line("[global::UnityEngine.RuntimeInitializeOnLoadMethod(global::UnityEngine.RuntimeInitializeLoadType.AfterAssembliesLoaded)]");
        } else {
            p.print_line("[global::System.Runtime.CompilerServices.ModuleInitializer]");
        }
        p.print_line("internal static void Register()");
        p.open_scope();
        for ty in self.value_types.iter().chain(&self.ref_types) {
            p.print_line(format!(
                "{UNION_CONVERTER}.TryRegister<{}>({}.Converter.Default);",
                ty.full_name,
                ty.union_name(),
            ));
        }
        p.close_scope();
        p.print_empty_line();

        // The managed code stripper matches this attribute by name.
        p.print_line("[global::System.AttributeUsage(global::System.AttributeTargets.All, Inherited = false)]");
        p.print_line(&generated);
        p.print_line("private sealed class PreserveAttribute : global::System.Attribute { }");

        p.close_scope();
        end_unit(p)
    }
}

fn unit(ty: &UnionType, text: String) -> GeneratedSource {
    GeneratedSource {
        hint_name: hint_name(&ty.full_name, "__Union"),
        text,
    }
}

fn begin_unit() -> Printer {
    let mut p = Printer::new();
    p.print_block(AUTO_GENERATED_HEADER);
    p.print_empty_line();
    p.print_line(format!("namespace {UNIONS_NAMESPACE}"));
    p.open_scope();
    p
}

fn end_unit(mut p: Printer) -> String {
    p.close_scope();
    p.into_string()
}

fn write_value_union(ty: &UnionType) -> String {
    let name = ty.union_name();
    let full = &ty.full_name;
    let mut p = begin_unit();

    p.print_line(generated_code(UNION_GENERATOR));
    p.print_line(EXCLUDE_COVERAGE);
    p.print_line(STRUCT_LAYOUT_EXPLICIT);
    p.print_line(format!("internal readonly struct {name} : global::ZBase.Foundation.Mvvm.Unions.IUnion<{full}>"));
    p.open_scope();

    p.print_line(META_OFFSET);
    p.print_line(format!("public readonly {UNION_TYPE} Union;"));
    p.print_empty_line();
    p.print_line(DATA_OFFSET);
    p.print_line(format!("public readonly {full} Value;"));
    p.print_empty_line();

    p.print_line(format!("public {name}({full} value)"));
    p.open_scope();
    p.print_line(format!("this.Union = new {UNION_TYPE}(global::ZBase.Foundation.Mvvm.Unions.UnionTypeKind.ValueType, global::ZBase.Foundation.Mvvm.Unions.TypeId.Of<{full}>());"));
    p.print_line("this.Value = value;");
    p.close_scope();
    p.print_empty_line();

    p.print_line(format!("public {name}(in {UNION_TYPE} union)"));
    p.open_scope();
    p.print_line("this.Value = default;");
    p.print_line("this.Union = union;");
    p.close_scope();
    p.print_empty_line();

    write_converter(&mut p, ty, "return union.TypeId == global::ZBase.Foundation.Mvvm.Unions.TypeId.Of<T>();");

    p.close_scope();
    end_unit(p)
}

fn write_ref_union(ty: &UnionType) -> String {
    let name = ty.union_name();
    let full = &ty.full_name;
    let mut p = begin_unit();

    p.print_line(generated_code(UNION_GENERATOR));
    p.print_line(EXCLUDE_COVERAGE);
    p.print_line(format!("internal readonly struct {name} : global::ZBase.Foundation.Mvvm.Unions.IUnion<{full}>"));
    p.open_scope();

    p.print_line(format!("public readonly {UNION_TYPE} Union;"));
    p.print_empty_line();

    p.print_line(format!("public {name}({full} value)"));
    p.open_scope();
    p.print_line(format!("this.Union = new {UNION_TYPE}(value);"));
    p.close_scope();
    p.print_empty_line();

    p.print_line(format!("public {name}(in {UNION_TYPE} union)"));
    p.open_scope();
    p.print_line("this.Union = union;");
    p.close_scope();
    p.print_empty_line();

    p.print_line(format!("public {full} Value => this.Union.Object as {full};"));
    p.print_empty_line();

    write_converter(&mut p, ty, "return union.Object is T;");

    p.close_scope();
    end_unit(p)
}

/// The nested converter registered for the union. `check` is the body of
/// the type test, written against a type parameter `T` aliasing the type.
fn write_converter(p: &mut Printer, ty: &UnionType, check: &str) {
    let name = ty.union_name();
    let full = &ty.full_name;

    p.print_line(format!("public sealed class Converter : {IUNION_CONVERTER_T}<{full}>"));
    p.open_scope();

    p.print_line("public static readonly Converter Default = new Converter();");
    p.print_empty_line();
    p.print_line("private Converter() { }");
    p.print_empty_line();

    p.print_line(format!("public {UNION_TYPE} ToUnion({full} value)"));
    p.print_line(format!("    => new {name}(value).Union;"));
    p.print_empty_line();

    p.print_line(format!("public bool TryGetValue(in {UNION_TYPE} union, out {full} result)"));
    p.open_scope();
    p.print_line(format!("if (Is<{full}>(union))"));
    p.open_scope();
    p.print_line(format!("result = new {name}(union).Value;"));
    p.print_line("return true;");
    p.close_scope();
    p.print_empty_line();
    p.print_line("result = default;");
    p.print_line("return false;");
    p.close_scope();
    p.print_empty_line();

    p.print_line(format!("private static bool Is<T>(in {UNION_TYPE} union)"));
    p.open_scope();
    p.print_line(check);
    p.close_scope();

    p.close_scope();
}
