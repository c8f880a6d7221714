use glam::{IVec2, IVec3, IVec4, Quat, UVec2, UVec3, Vec2, Vec3, Vec4};

use crate::{impl_leaf_info_for, impl_type_methods, Structured, Type};

macro_rules! impl_structured {
    ($($ty:ty => [$($idx:literal : $component:ident),*];)*) => {
        $(
            impl_leaf_info_for!($ty);

            impl Type for $ty {
                impl_type_methods!(Structured);
            }

            impl Structured for $ty {
                fn component_names(&self) -> &'static [&'static str] {
                    &[$(stringify!($component)),*]
                }

                fn component(&self, idx: usize) -> Option<&dyn Type> {
                    match idx {
                        $($idx => Some(&self.$component as &dyn Type),)*
                        _ => None,
                    }
                }

                fn component_mut(&mut self, idx: usize) -> Option<&mut dyn Type> {
                    match idx {
                        $($idx => Some(&mut self.$component as &mut dyn Type),)*
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_structured! {
    Vec2 => [0: x, 1: y];
    Vec3 => [0: x, 1: y, 2: z];
    Vec4 => [0: x, 1: y, 2: z, 3: w];
    IVec2 => [0: x, 1: y];
    IVec3 => [0: x, 1: y, 2: z];
    IVec4 => [0: x, 1: y, 2: z, 3: w];
    UVec2 => [0: x, 1: y];
    UVec3 => [0: x, 1: y, 2: z];
    Quat => [0: x, 1: y, 2: z, 3: w];
}
