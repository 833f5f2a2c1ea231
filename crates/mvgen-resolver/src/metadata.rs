//! Bundled metadata references.
//!
//! A referenced assembly is described by its identity and by declaration
//! source for the types it exports. The declarations are parsed with the
//! same parser as user code; bodies are irrelevant and left empty.

use std::borrow::Cow;

use mvgen_core::AssemblyIdentity;

/// A referenced assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataReference {
    pub identity: AssemblyIdentity,
    pub source: Cow<'static, str>,
}

impl MetadataReference {
    pub fn new(identity: AssemblyIdentity, source: impl Into<Cow<'static, str>>) -> Self {
        Self { identity, source: source.into() }
    }

    /// Path used for locations inside this reference.
    pub fn display_path(&self) -> String {
        format!("{}.dll", self.identity.name)
    }
}

/// The core library: primitives, `System.Object`, common attributes and collections.
pub fn core_library() -> MetadataReference {
    MetadataReference::new(
        AssemblyIdentity::new("System.Runtime").with_version("6.0.0.0"),
        CORE_LIBRARY,
    )
}

/// The MVVM runtime: binder, observable-object and union contract types.
pub fn mvvm_library() -> MetadataReference {
    MetadataReference::new(
        AssemblyIdentity::new("ZBase.Foundation.Mvvm").with_version("1.0.0.0"),
        MVVM_LIBRARY,
    )
}

/// The UI framework assembly.
pub fn unity_engine() -> MetadataReference {
    MetadataReference::new(AssemblyIdentity::new("UnityEngine"), UNITY_ENGINE)
}

/// References every compilation gets: the core library and the MVVM runtime.
pub fn standard_references() -> Vec<MetadataReference> {
    vec![core_library(), mvvm_library()]
}

const CORE_LIBRARY: &str = r#"
namespace System
{
    public class Object { }
    public abstract class ValueType { }
    public abstract class Enum : ValueType { }
    public abstract class Array { }
    public abstract class Delegate { }
    public sealed class String { }
    public abstract class Type { }
    public abstract class Attribute { }
    public class Exception { }

    public readonly struct Boolean { }
    public readonly struct Byte { }
    public readonly struct SByte { }
    public readonly struct Char { }
    public readonly struct Int16 { }
    public readonly struct UInt16 { }
    public readonly struct Int32 { }
    public readonly struct UInt32 { }
    public readonly struct Int64 { }
    public readonly struct UInt64 { }
    public readonly struct Single { }
    public readonly struct Double { }
    public readonly struct Decimal { }
    public readonly struct IntPtr { }
    public readonly struct Guid { }
    public readonly struct DateTime { }
    public readonly struct TimeSpan { }
    public struct Nullable<T> where T : struct { }

    public struct ValueTuple<T1> { }
    public struct ValueTuple<T1, T2> { }
    public struct ValueTuple<T1, T2, T3> { }
    public struct ValueTuple<T1, T2, T3, T4> { }

    public readonly struct ReadOnlySpan<T> { }
    public readonly struct Span<T> { }
    public readonly struct Memory<T> { }
    public readonly struct ReadOnlyMemory<T> { }

    public interface IDisposable { }
    public interface IEquatable<T> { }
    public interface IComparable<T> { }

    public sealed class Action : Delegate { }
    public sealed class Action<T> : Delegate { }
    public sealed class Func<TResult> : Delegate { }

    public enum AttributeTargets { All = 32767 }

    public sealed class AttributeUsageAttribute : Attribute
    {
        public AttributeUsageAttribute(AttributeTargets validOn) { }
        public bool AllowMultiple { get; set; }
        public bool Inherited { get; set; }
    }

    public sealed class SerializableAttribute : Attribute { }
    public sealed class NonSerializedAttribute : Attribute { }
    public sealed class ObsoleteAttribute : Attribute { }
}

namespace System.Collections.Generic
{
    public interface IEnumerable<T> { }
    public interface IReadOnlyList<T> : IEnumerable<T> { }
    public interface IList<T> : IEnumerable<T> { }
    public class List<T> : IList<T>, IReadOnlyList<T> { }
    public class Dictionary<TKey, TValue> { }
    public class HashSet<T> : IEnumerable<T> { }
}

namespace System.Runtime.InteropServices
{
    public enum LayoutKind { Sequential = 0, Explicit = 2, Auto = 3 }
    public sealed class StructLayoutAttribute : Attribute { public StructLayoutAttribute(LayoutKind layoutKind) { } }
    public sealed class FieldOffsetAttribute : Attribute { public FieldOffsetAttribute(int offset) { } }
}

namespace System.Runtime.CompilerServices
{
    public enum MethodImplOptions { AggressiveInlining = 256 }
    public sealed class MethodImplAttribute : Attribute { public MethodImplAttribute(MethodImplOptions options) { } }
}

namespace System.CodeDom.Compiler
{
    public sealed class GeneratedCodeAttribute : Attribute { public GeneratedCodeAttribute(string tool, string version) { } }
}

namespace System.Diagnostics.CodeAnalysis
{
    public sealed class ExcludeFromCodeCoverageAttribute : Attribute { }
    public sealed class NotNullAttribute : Attribute { }
}
"#;

const MVVM_LIBRARY: &str = r#"
using System;

namespace ZBase.Foundation.Mvvm
{
    [AttributeUsage(AttributeTargets.All)]
    public sealed class SkipGeneratorForAssemblyAttribute : Attribute { }

    public sealed class NotifyPropertyChangedAttribute : Attribute
    {
        public NotifyPropertyChangedAttribute(string propertyName, Type propertyType) { }
    }
}

namespace ZBase.Foundation.Mvvm.ComponentModel
{
    public interface INotifyPropertyChanged { }
    public interface IObservableObject : INotifyPropertyChanged { }
    public sealed class ObservablePropertyAttribute : Attribute { }
    public sealed class NotifyPropertyChangedForAttribute : Attribute
    {
        public NotifyPropertyChangedForAttribute(string propertyName) { }
    }
}

namespace ZBase.Foundation.Mvvm.Input
{
    public interface ICommand { }
    public interface IRelayCommand : ICommand { }
    public interface IRelayCommand<T> : IRelayCommand { }
    public sealed class RelayCommandAttribute : Attribute { }
}

namespace ZBase.Foundation.Mvvm.Unions
{
    public readonly struct Union { }
    public interface IUnion<T> { }
    public interface IUnionConverter<T> { }

    public static class UnionConverter
    {
        public static void TryRegister<T>(IUnionConverter<T> converter) { }
    }
}

namespace ZBase.Foundation.Mvvm.ViewBinding
{
    using ZBase.Foundation.Mvvm.Unions;

    public interface IBindingContext { }
    public interface IBinder { }

    public sealed class BindingPropertyAttribute : Attribute { }
    public sealed class BindingCommandAttribute : Attribute { }

    public sealed class LabelAttribute : Attribute
    {
        public LabelAttribute(string label) { }
    }

    [Serializable]
    public class BindingProperty
    {
        public string TargetPropertyName { get; set; }
    }

    [Serializable]
    public class BindingCommand
    {
        public string TargetCommandName { get; set; }
    }

    [Serializable]
    public class Converter
    {
        public Union Convert(in Union union) => union;
    }

    public abstract class MonoBinder<T> : global::UnityEngine.MonoBehaviour, IBinder
        where T : global::UnityEngine.Object
    {
        public virtual void BindMembers(IBindingContext context) { }
    }
}
"#;

const UNITY_ENGINE: &str = r#"
using System;

namespace UnityEngine
{
    public class Object { }
    public class Component : Object { }
    public class Behaviour : Component { }
    public class MonoBehaviour : Behaviour { }
    public sealed class GameObject : Object { }
    public class Transform : Component { }
    public sealed class RectTransform : Transform { }
    public sealed class Sprite : Object { }
    public class Material : Object { }
    public class Texture : Object { }
    public class ScriptableObject : Object { }

    public struct Vector2 : IEquatable<Vector2> { }
    public struct Vector3 : IEquatable<Vector3> { }
    public struct Vector4 : IEquatable<Vector4> { }
    public struct Vector2Int : IEquatable<Vector2Int> { }
    public struct Quaternion : IEquatable<Quaternion> { }
    public struct Color : IEquatable<Color> { }
    public struct Color32 { }
    public struct Rect : IEquatable<Rect> { }
    public struct Bounds : IEquatable<Bounds> { }

    public enum RuntimeInitializeLoadType { AfterSceneLoad = 0, BeforeSceneLoad = 1, AfterAssembliesLoaded = 2, BeforeSplashScreen = 3, SubsystemRegistration = 4 }

    public sealed class SerializeField : Attribute { }
    public sealed class HideInInspector : Attribute { }
    public sealed class TooltipAttribute : Attribute { public TooltipAttribute(string tooltip) { } }
    public sealed class AddComponentMenu : Attribute { public AddComponentMenu(string menuName) { } }
    public sealed class RuntimeInitializeOnLoadMethodAttribute : Attribute
    {
        public RuntimeInitializeOnLoadMethodAttribute(RuntimeInitializeLoadType loadType) { }
    }
}

namespace UnityEngine.UI
{
    public abstract class Graphic : UnityEngine.Behaviour { }
    public class Text : Graphic { }
    public class Image : Graphic { }
    public class Button : UnityEngine.Behaviour { }
    public class Slider : UnityEngine.Behaviour { }
    public class Toggle : UnityEngine.Behaviour { }
}
"#;
