// src/prompt.rs
//! Prompt assembly for the dermatologist chat call.
//!
//! The output is sent verbatim as a single user message, so every line here
//! is part of the product's behaviour: section order, number formatting and
//! the closing instruction block are fixed.
use crate::models::{LifestyleInput, SkinMetrics};
use std::fmt::Write as _;

const PERSONA: &str = "You are a friendly dermatologist who gives warm, caring, and easy-to-understand advice about skincare.\n\n";

const STRESS_LABELS: [(i64, &str); 5] = [
    (1, "low"),
    (2, "low-medium"),
    (3, "medium"),
    (4, "medium-high"),
    (5, "high"),
];

/// Rendered in place of a value the upstream left out.
const MISSING: &str = "undefined";

/// Clinical guidance appended to every prompt. Edit only with product sign-off.
pub const TASK_INSTRUCTIONS: &str = r#"YOUR TASK
Compare today's skin condition with yesterday's (acne redness/coverage, blackspot darkness/coverage).

State clearly if the skin is improving, stable, or worsening. Use exactly one of these words for each area (Acne, Dark spots) and for Overall: improving / stable / worsening. Do not include numeric deltas in the wording. If yesterday's data are missing, say "insufficient to compare" and base advice on TODAY only.

Use a warm, encouraging tone.

If improved: congratulate and suggest maintaining the routine.
If worsened: reassure, reduce worry, and recommend a gentler routine.

Consider sleep and stress level:
- If sleep < 7 hours or irregular: explain briefly how sleep affects inflammation/oil control and suggest small fixes (consistent bedtime, gentler/non-stripping cleanser, basic moisturizer).
- If stress = medium/high: acknowledge it compassionately; note how stress can increase oil/redness/breakouts; recommend simple calming habits (breathing, short walk, wind-down routine) and a skin routine that avoids over-exfoliation.

Provide general routine advice for today:
- Use weather (heat/humidity/UV) and exercise (sweat) to tailor cleansing, hydration, and sunscreen reminders.
- Keep advice practical and easy to follow.

Recommend skincare ingredients only (no product names/brands):
- Choose 3–6 ingredients tied to the findings (e.g., acne/redness/oil → Salicylic Acid, Niacinamide, Azelaic Acid, Zinc PCA, Panthenol; dark spots → Vitamin C, Arbutin, Kojic Acid, Tranexamic Acid, plus Sunscreen filters).
- For each recommended ingredient, include: name | purpose | typical strength | frequency | best pairs | avoid with | layer as (Toner/Serum/Moisturizer).

Ingredient combinations (be specific):
- Compatible (same routine OK): Niacinamide 4–5% with BHA 0.5–2% / Azelaic 10% / Tranexamic 2–5% / Arbutin 2–7% / Vitamin C (L-AA 8–15% or derivatives) / Zinc PCA / Panthenol / Ceramides. Vitamin C AM + Niacinamide AM/PM is OK. Azelaic 10% + Tranexamic/Arbutin OK.
- Caution (separate by time or alternate nights): AHA/BHA ↔ Retinoid (retinol/retinal); Benzoyl Peroxide 2.5–5% ↔ Retinoid; strong Vitamin C (≥15% L-AA) with strong acids in the same routine.
- Avoid layering (same routine) for most users: multiple strong exfoliants together (AHA + BHA stacks); high-dose Kojic with strong AHA in one go. Always include a short reason to reduce irritation risk.

Layering map (pick what fits TODAY’s findings) — Toner → Serum → Moisturizer:
- Toner (daily hydrating): Glycerin, Hyaluronic Acid, Panthenol, Beta-glucan, Centella, Green tea.
- Toner (acid, 1–3×/week if tolerated): AHA 5–10% (glycolic/lactic) for dullness; BHA 0.5–2% for oil/clogs. Skip if skin is irritated/sensitive today.
- Serum (choose 1–2): 
  • Acne/oil: Niacinamide 4–5%, BHA 0.5–2%, Zinc PCA, Azelaic 10%. 
  • Dark spots: Vitamin C (L-AA 8–15% AM or derivatives), Tranexamic 2–5%, Arbutin 2–7%, Azelaic 10%.
  • Redness/barrier: Panthenol, Centella, Peptides.
- Moisturizer: 
  • Oily/combination → light gel-cream (Niacinamide 3–4%, Ceramides, Squalane). 
  • Dry/sensitive → richer cream (Ceramides + Cholesterol + Fatty acids, Panthenol).
- Order rule: thin → thick; antioxidants/brighteners → retinoid (PM) → moisturizer → sunscreen (AM last).

Safety notes:
- Avoid stacking strong actives the same night (AHA/BHA + retinoid; benzoyl peroxide + strong retinoid). Patch test; pause actives if irritation persists; sunscreen SPF ≥30 daily with reapply guidance.

Writing style:
Clear, empathetic, 2–3 short paragraphs plus concise bullets in the second section. Gentle, supportive, like a personal consultation. Avoid overly technical language; keep it simple and comforting.

EXPECTED OUTPUT
Return the answer in English with two sections:
1) Today's Assessment  — say status for Acne, Dark spots, and Overall using only improving/stable/worsening (no percentages); 3–5 sentences max, warm and clear.
2) Advice & Recommended Ingredients — include AM routine, PM routine, Layering map (Toner/Serum/Moisturizer), Ingredient combinations (Compatible/Caution/Avoid), 3–6 Recommended ingredients with strength/frequency/pairings/avoid-with, plus 1–2 safety notes tailored to sleep/stress/weather/exercise."#;

/// Hours between two `HH:MM` clock times, rounded to one decimal.
///
/// A wake time earlier than the sleep time is taken to be on the next day.
/// Equal times give `0.0`. Returns `None` when either value is not `H:M`.
pub fn sleep_hours(sleep_time: &str, wake_time: &str) -> Option<f64> {
    let sleep_minutes = i64::from(minutes_since_midnight(sleep_time)?);
    let mut wake_minutes = i64::from(minutes_since_midnight(wake_time)?);

    if wake_minutes < sleep_minutes {
        wake_minutes += 24 * 60;
    }

    // Out-of-range clocks (e.g. "30:00") can still leave this negative.
    let total = (wake_minutes - sleep_minutes) as f64;
    Some(((total / 60.0) * 10.0).round() / 10.0)
}

fn minutes_since_midnight(clock: &str) -> Option<u32> {
    let (hours, minutes) = clock.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Label used in the `Stress level` line. Unknown levels read as "medium".
pub fn stress_label(level: i64) -> &'static str {
    STRESS_LABELS
        .iter()
        .find(|(value, _)| *value == level)
        .map(|(_, label)| *label)
        .unwrap_or("medium")
}

/// One decimal place of the exact binary value. Exact ties round away from
/// zero; `{:.1}` alone would round them to even.
fn fixed1(value: f64) -> String {
    let scaled = value * 10.0;
    let exact = value.mul_add(10.0, -scaled) == 0.0;
    if exact && scaled.fract().abs() == 0.5 {
        format!("{:.1}", scaled.round() / 10.0)
    } else {
        format!("{:.1}", value)
    }
}

fn fixed1_or_missing(value: Option<f64>) -> String {
    value.map(fixed1).unwrap_or_else(|| MISSING.to_string())
}

fn push_metrics(prompt: &mut String, data: &SkinMetrics) {
    let _ = write!(
        prompt,
        "File: {}\n\n",
        data.file.as_deref().unwrap_or(MISSING)
    );

    if let Some(regions) = data.top_brightest_regions.as_deref().filter(|r| !r.is_empty()) {
        let regions = regions
            .iter()
            .map(|r| format!("{}={}", r.region, fixed1(r.brightness)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(prompt, "Top Brightest Regions: {}\n\n", regions);
    }

    if let Some(acne) = &data.acne {
        let _ = write!(prompt, "Acne: class={}", acne.class);
        if let Some(redness) = acne.redness {
            let _ = write!(
                prompt,
                ", redness={}, coverage={}%",
                fixed1(redness),
                fixed1_or_missing(acne.coverage)
            );
        }
        prompt.push_str("\n\n");
    }

    if let Some(bs) = &data.blackspot {
        let _ = write!(prompt, "Blackspot: class={}", bs.class);
        if let Some(darkness) = bs.darkness_level {
            let _ = write!(
                prompt,
                ", darkness={}, coverage={}%",
                fixed1(darkness),
                fixed1_or_missing(bs.coverage_ratio.map(|r| r * 100.0))
            );
        }
        prompt.push_str("\n\n");
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn push_lifestyle(prompt: &mut String, lifestyle: &LifestyleInput) {
    prompt.push_str("LIFESTYLE\n");

    if let (Some(sleep), Some(wake)) = (
        non_empty(&lifestyle.sleep_time),
        non_empty(&lifestyle.wake_time),
    ) {
        match sleep_hours(sleep, wake) {
            Some(hours) => {
                let _ = write!(
                    prompt,
                    "Sleep: slept at {}, woke at {} (≈ {} hours)\n\n",
                    sleep, wake, hours
                );
            }
            None => log::debug!("Skipping sleep line for unparsable times {sleep:?}/{wake:?}"),
        }
    }

    if let Some(level) = lifestyle.stress_level.filter(|l| *l != 0) {
        let _ = write!(prompt, "Stress level: {}\n\n", stress_label(level));
    }

    // Zero minutes is treated as "not reported".
    if let Some(minutes) = lifestyle
        .exercise_minutes
        .filter(|m| *m != 0.0 && !m.is_nan())
    {
        let _ = write!(prompt, "Exercise: {} minutes\n\n", minutes);
    }

    if let Some(weather) = &lifestyle.weather {
        prompt.push_str("WEATHER\n");
        if let Some(t) = weather.temperature {
            let _ = writeln!(prompt, "Temperature: {} °C", t);
        }
        if let Some(h) = weather.humidity {
            let _ = writeln!(prompt, "Humidity: {}%", h);
        }
        if let Some(uv) = weather.uv_index {
            let _ = writeln!(prompt, "UV index: {}", uv);
        }
        prompt.push('\n');
    }
}

/// Builds the full instruction text for the chat model.
///
/// `yesterday` is optional history: when it is absent (or has no `file`) the
/// yesterday block is left out and the instructions tell the model to say the
/// data is insufficient to compare.
pub fn build_dermatologist_prompt(
    yesterday: Option<&SkinMetrics>,
    today: &SkinMetrics,
    lifestyle: &LifestyleInput,
) -> String {
    let mut prompt = String::from(PERSONA);

    if let Some(yesterday) = yesterday.filter(|y| non_empty(&y.file).is_some()) {
        prompt.push_str("YESTERDAY'S DATA\n");
        push_metrics(&mut prompt, yesterday);
    }

    prompt.push_str("TODAY'S DATA\n");
    push_metrics(&mut prompt, today);

    push_lifestyle(&mut prompt, lifestyle);

    prompt.push_str(TASK_INSTRUCTIONS);
    prompt
}
