use std::{borrow::Cow, time::Duration};

use uuid::Uuid;

use super::impl_leaf;
use crate::{value::Value, Version};

impl_leaf!(
    bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);

impl_leaf!(String, Box<str>, Cow<'static, str>);

impl_leaf!(Duration, Uuid, Version, Value);
