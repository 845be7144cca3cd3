//! The single downstream synthesis step: combine all specialist sections into
//! one principal-investigator instruction and run it through the same
//! classification rules as an individual specialist call.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use crate::glm::GenerationCapability;
use crate::specialist::{run_classified, Specialist, TaskResult};

/// Runs the one synthesis call that turns aggregated sections into the final
/// proposal text. Sequenced after fan-out; never concurrent with it.
pub struct SynthesisStage {
    capability: Arc<dyn GenerationCapability>,
    timeout: Duration,
}

impl SynthesisStage {
    pub fn new(capability: Arc<dyn GenerationCapability>, timeout: Duration) -> Self {
        Self {
            capability,
            timeout,
        }
    }

    /// Build the combined instruction and execute it once, bounded by the
    /// stage timeout. Classification matches the specialist invoker exactly.
    pub async fn synthesize(
        &self,
        topic: &str,
        sections: &BTreeMap<Specialist, String>,
    ) -> TaskResult {
        let prompt = build_prompt(topic, sections);
        run_classified(self.capability.as_ref(), &prompt, self.timeout).await
    }
}

/// Deterministically format the synthesis instruction.
///
/// Sections are embedded in fixed enum order regardless of map iteration
/// order; a missing entry gets a placeholder line instead of being dropped.
pub fn build_prompt(topic: &str, sections: &BTreeMap<Specialist, String>) -> String {
    let mut prompt = format!(
        "You are a Principal Investigator (PI) writing a generic one-year seed R&D project \
         proposal.\n\
         The core project idea is: \"{topic}\"\n\
         You have received draft sections from 6 specialist agents. Synthesize these into a \
         formal, coherent, compelling proposal document. If inputs contain errors, note this.\n\
         \n\
         Structure the proposal with: title page placeholder, executive summary, project \
         background, objectives, technical framework, market context, project plan (timeline, \
         KPIs, risks), budget outline, project team placeholder, impact and significance, \
         transferable assets, and conclusion. Use a formal tone and [...] placeholders for \
         specifics.\n\
         \n\
         --- [BEGIN SPECIALIST INPUTS] ---\n"
    );

    for (i, identity) in Specialist::ALL.iter().enumerate() {
        let body = sections
            .get(identity)
            .map(String::as_str)
            .unwrap_or("No content received or error occurred.");
        let _ = write!(
            prompt,
            "\n--- {}. {} ---\n{body}\n",
            i + 1,
            identity.section_title()
        );
    }

    prompt.push_str(
        "\n--- [END SPECIALIST INPUTS] ---\n\
         \n\
         Now, generate the complete, synthesized proposal adhering strictly to the guidelines.",
    );
    prompt
}
