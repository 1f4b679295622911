// Built-in catalog for the productivity strategy plan template.

use crate::catalog::SectionSpec;

const FOCUS_BUSINESS: &str = r#"**Task:** Write a formal executive summary for the "Focus: Business Section".

**STYLE GUIDELINES (Strict):**
1. **Format:** Continuous narrative paragraphs. **DO NOT** use Markdown headers (like ## or ###).
2. **Tone:** Professional, objective and concise. Do not use phrases like "The transcript says" or "Jamie mentions". State the facts directly.
3. **Structure:**
   - **Para 1 (Context):** The company's operations, key clients and background. Include address or registration details only if present in the text.
   - **Para 2 (Strategy):** The commercial priority, e.g. reliance on a key client or the goal to improve efficiency and margins.
   - **Para 3 (The Focus):** The chosen area for productivity improvement and why it is critical.
   - **Ending List:** A simple text list of the top-level productivity focus areas (e.g. Direct labour productivity, Throughput rate)."#;

const MEASURE_BUSINESS: &str = r#"**Main Context:** Identification and alignment of relevant KPI/productivity metrics.

**Please answer these specific sub-questions:**
1. What is the current level of output/throughput/capacity?
2. What is the high-level productivity measure (e.g. Total productivity, Labour productivity)?
3. What is the current level of this chosen productivity metric?
4. Which business process KPIs align with or affect the chosen productivity focus area?
5. If relevant data is not available, how will it be collected in the future?
6. What is the management process/plan for ongoing extraction and monitoring of key data sets?"#;

const FOCUS_IMPROVEMENT: &str = r#"**Main Context:** An outline of the improvement plan for the focus area.

**Please answer these specific sub-questions:**
1. Identify the main root causes of the current KPI performance.
2. Describe the improvement plan that addresses these causes and justify how it improves high-level productivity.
3. What is the expected performance improvement in the business process KPI?
4. What is the expected new level of output/throughput/capacity?
5. What is the expected change in the high-level productivity measure?
6. What is the expected benefit and/or financial saving?"#;

const FOCUS_ACTIONS: &str = r#"**Task:** Extract 3 high-priority process improvement actions.

**STYLE GUIDELINES (Strict):**
1. **Tone:** Process engineer / Lean Six Sigma. Start every line with an imperative verb (e.g. "Complete", "Define", "Map", "Implement"). Use technical terms where relevant (SOPs, Value Stream Map, Skills Matrix, FTEs).
2. **Format:** A clean vertical list of punchy phrases. **DO NOT** use "Action:" or "Milestone:" labels. **DO NOT** write long explanations; keep each item under 15 words.
3. **Content:** Practical steps to execute the plan (mapping the process, defining roles, collecting data)."#;

const MEASURE_ACTIONS: &str = r#"**Task:** List 3 key measurement frameworks and resource controls to be implemented.

**STYLE GUIDELINES:**
1. **Content Requirements:**
   - Selection and implementation of KPIs by category (Outcome, Quality, Flow, Cost, Delivery).
   - FTE utilisation or workforce tracking.
   - Physical changes (e.g. Layout, Automation, Storage).
   - Incentives (e.g. Bonus schemes, RFT targets).
2. **Tone:** Operational and structural.
3. **Format:** A clean vertical list of exactly 3 punchy phrases. **DO NOT** use "Action:" or "Milestone:" labels. Keep each item under 15 words."#;

const IMPROVE_ACTIONS: &str = r#"**Task:** List 3 specific data metrics and productivity formulas to be monitored.

**STYLE GUIDELINES:**
1. **Content Requirements:**
   - Time by process (variations, limits).
   - Direct labour productivity (Sales/Costs breakdown).
   - Throughput and Process Flow.
   - Rework and Root Cause Identification.
2. **Tone:** Analytical and data-focused.
3. **Format:** A clean vertical list of exactly 3 punchy phrases. **DO NOT** use "Action:" or "Milestone:" labels. Keep each item under 15 words."#;

pub(super) fn sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec::new("Focus: Business Section", FOCUS_BUSINESS),
        SectionSpec::new("Measure: Business Section", MEASURE_BUSINESS),
        SectionSpec::new("Focus: Improvement", FOCUS_IMPROVEMENT),
        SectionSpec::new("Focus:Action/Milestone", FOCUS_ACTIONS),
        SectionSpec::new("Measure:Action/Milestone", MEASURE_ACTIONS),
        SectionSpec::new("Improve:Action/Milestone", IMPROVE_ACTIONS),
    ]
}
