//! Flow annotation erasure.

use super::Transformer;
use crate::context::TransformContext;
use crate::driver::Driver;
use zest_common::Result;

#[derive(Debug, Default)]
pub struct FlowTransformer;

impl FlowTransformer {
    pub fn new() -> Self {
        FlowTransformer
    }
}

impl Transformer for FlowTransformer {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn process(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<bool> {
        Ok(driver.process_possible_arrow_param_end(cx)?
            || driver.process_possible_async_arrow_with_type_params(cx)?
            || driver.process_possible_type_range(cx)?)
    }
}
