//! Fixed answers for broad keyword-only queries.
//!
//! Single-keyword questions like "hr" or "products" retrieve poorly and
//! frustrate users with vague answers. Instead of embedding them, the
//! pipeline checks the raw query against these trigger sets first and
//! replies with guidance text that steers the user toward a concrete
//! follow-up question. The trigger sets overlap with the shortcut table in
//! [`crate::normalize`] on purpose: this check runs first, so a bare "hr"
//! never reaches the expansion path.

/// Queries answered with the HR topic guide.
const HR_TRIGGERS: &[&str] = &["hr", "human resources", "hr policy"];

/// Queries answered with the product catalog guide.
const PRODUCT_TRIGGERS: &[&str] = &["products", "product", "services", "what do you sell"];

pub const HR_GUIDANCE: &str = r#"Here are some key HR topics I can help you with:
1. **Leave Policy**: Ask about PTO, sick leave, or parental leave.
2. **Benefits**: Ask about health insurance, 401(k), or wellness stipends.
3. **Working Hours**: Ask about remote work or core hours.
4. **Onboarding**: Ask about the process for new hires.

Try asking: "What is the vacation policy?"#;

pub const PRODUCT_GUIDANCE: &str = r#"Acme Tech Solutions offers 5 main products:
1. **AcmeFlow**: Project Management.
2. **AcmeSecure**: Cybersecurity.
3. **AcmeConnect**: Unified Communications.
4. **DataAcme**: Business Intelligence.
5. **CloudOne**: AI Infrastructure.

Try asking: "Tell me more about AcmeFlow" or "Explain all products briefly"."#;

/// Return the fixed answer for a broad query, or `None` to continue with
/// retrieval.
///
/// Comparison is on the lower-cased, trimmed query; matching is exact, so
/// "hr policies" (not a trigger) falls through to the pipeline.
pub fn rule_answer(query: &str) -> Option<&'static str> {
    let q = query.trim().to_lowercase();

    if HR_TRIGGERS.contains(&q.as_str()) {
        return Some(HR_GUIDANCE);
    }

    if PRODUCT_TRIGGERS.contains(&q.as_str()) {
        return Some(PRODUCT_GUIDANCE);
    }

    None
}
