//! Page output commands: save as PDF, print, print preview

use async_trait::async_trait;

use crate::commands::{Action, CommandContext};
use crate::error::Result;
use crate::types::{ExecutionContext, Payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutput {
    Pdf,
    Print,
    PrintPreview,
}

pub struct PageOutputCommand {
    pub output: PageOutput,
}

impl PageOutputCommand {
    pub fn new(output: PageOutput) -> Self {
        Self { output }
    }
}

#[async_trait]
impl Action for PageOutputCommand {
    fn name(&self) -> &'static str {
        match self.output {
            PageOutput::Pdf => "SaveAsPDF",
            PageOutput::Print => "Print",
            PageOutput::PrintPreview => "PrintPreview",
        }
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        match self.output {
            PageOutput::Pdf => cx.host.save_as_pdf(ctx.id).await?,
            PageOutput::Print => cx.host.print(ctx.id).await?,
            PageOutput::PrintPreview => cx.host.print_preview(ctx.id).await?,
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
