use super::Feature;
use crate::{processors::Context, reflection::TypeReflectionMap, value::Value, Error, Marker, Result};

/// Enforces members marked as required during deserialization.
///
/// A required member must be present in the source data, and must not
/// be null when declared as `required(non_null)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequiredValues;

impl Feature for RequiredValues {}

impl RequiredValues {
    pub(crate) fn check(
        &self,
        map: &TypeReflectionMap,
        marker: Marker,
        data: &Value,
        cx: &Context<'_>,
    ) -> Result<()> {
        let comparison = cx.definition().key_comparison();

        for member in map.required_members(marker) {
            let non_null = member.required().map_or(false, |r| r.non_null);
            match data.at(member.slot(), comparison) {
                None => {
                    return Err(Error::RequiredMissing {
                        member: member.name(),
                        path: cx.path(),
                    })
                }
                Some(Value::Null) if non_null => {
                    return Err(Error::RequiredNull {
                        member: member.name(),
                        path: cx.path(),
                    })
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}
