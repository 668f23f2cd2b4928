//! Boilerplate shared by every layer implementation

/// Implements the property accessors of `LayerTrait` by delegating to a
/// `LayerProperties` field, plus the `as_any` cast.
///
/// Usage, inside an `impl LayerTrait for MyLayer` block:
/// ```ignore
/// crate::impl_layer_trait!(properties);
/// ```
#[macro_export]
macro_rules! impl_layer_trait {
    ($properties_field:ident) => {
        fn id(&self) -> &str {
            &self.$properties_field.id
        }

        fn z_index(&self) -> i32 {
            self.$properties_field.z_index
        }

        fn set_z_index(&mut self, z_index: i32) {
            self.$properties_field.z_index = z_index;
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    };
}
