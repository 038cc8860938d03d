//! Preliminary eligibility rules
//!
//! Ratios:
//! - DTI = monthly debt / (annual income / 12)
//! - LTV = (property value - down payment) / property value
//!
//! Rules, evaluated in order:
//! 1. DTI < 43%, LTV < 80%, credit Good or Excellent: approved
//! 2. DTI < 43%, 80% <= LTV <= 95%: pre-qualified, PMI required
//! 3. anything else: manual review, with the failing criteria listed

use crate::contract::{
    AdvisorError, Assessment, AssessmentOutcome, AssessmentResult, CalculatedMetrics,
    CreditScoreCategory, UserInputs,
};

const MAX_DTI: f64 = 0.43;
const STANDARD_MAX_LTV: f64 = 0.80;
const PMI_MAX_LTV: f64 = 0.95;

/// Debt-to-income ratio; infinite when income is not positive
pub fn calculate_dti_ratio(annual_income: f64, monthly_debt: f64) -> f64 {
    if annual_income <= 0.0 {
        tracing::warn!(annual_income, "Invalid annual income for DTI calculation");
        return f64::INFINITY;
    }

    let monthly_income = annual_income / 12.0;
    let dti_ratio = monthly_debt / monthly_income;

    tracing::debug!(
        annual_income,
        monthly_debt,
        monthly_income,
        dti_ratio,
        "DTI ratio calculated"
    );

    dti_ratio
}

/// Loan-to-value ratio; infinite when the property value is not positive
pub fn calculate_ltv_ratio(property_value: f64, down_payment: f64) -> f64 {
    if property_value <= 0.0 {
        tracing::warn!(property_value, "Invalid property value for LTV calculation");
        return f64::INFINITY;
    }

    let loan_amount = property_value - down_payment;
    let ltv_ratio = loan_amount / property_value;

    tracing::debug!(
        property_value,
        down_payment,
        loan_amount,
        ltv_ratio,
        "LTV ratio calculated"
    );

    ltv_ratio
}

fn has_strong_credit(credit: Option<CreditScoreCategory>) -> bool {
    matches!(
        credit,
        Some(CreditScoreCategory::Good | CreditScoreCategory::Excellent)
    )
}

/// Apply the eligibility rules to precomputed ratios
pub fn assess_eligibility(inputs: &UserInputs, metrics: &CalculatedMetrics) -> Assessment {
    let CalculatedMetrics {
        dti_ratio,
        ltv_ratio,
    } = *metrics;
    let credit = inputs.credit_score_category;

    if dti_ratio < MAX_DTI && ltv_ratio < STANDARD_MAX_LTV && has_strong_credit(credit) {
        return Assessment {
            outcome: AssessmentOutcome::Approved,
            notes: "User meets all preliminary criteria for a standard mortgage.".to_string(),
        };
    }

    if dti_ratio < MAX_DTI && (STANDARD_MAX_LTV..=PMI_MAX_LTV).contains(&ltv_ratio) {
        return Assessment {
            outcome: AssessmentOutcome::PreQualified,
            notes: "User pre-qualifies but will need PMI due to high LTV ratio.".to_string(),
        };
    }

    let mut reasons = Vec::new();
    if dti_ratio >= MAX_DTI {
        reasons.push("DTI ratio is above 43%");
    }
    if matches!(
        credit,
        Some(CreditScoreCategory::Fair | CreditScoreCategory::Poor)
    ) {
        reasons.push("Credit score needs improvement");
    }
    if ltv_ratio > PMI_MAX_LTV {
        reasons.push("Down payment is insufficient");
    }

    Assessment {
        outcome: AssessmentOutcome::NeedsReview,
        notes: format!("Manual review required. Issues: {}.", reasons.join(", ")),
    }
}

/// Compute ratios and outcome for a full set of inputs
pub fn perform_complete_assessment(inputs: &UserInputs) -> Result<AssessmentResult, AdvisorError> {
    let (Some(annual_income), Some(monthly_debt)) = (inputs.annual_income, inputs.monthly_debt)
    else {
        tracing::error!("Missing required income data for assessment");
        return Err(AdvisorError::MissingInput {
            fields: vec!["annual_income".to_string(), "monthly_debt".to_string()],
        });
    };

    let (Some(property_value), Some(down_payment)) = (inputs.property_value, inputs.down_payment)
    else {
        tracing::error!("Missing required property data for assessment");
        return Err(AdvisorError::MissingInput {
            fields: vec!["property_value".to_string(), "down_payment".to_string()],
        });
    };

    let calculated_metrics = CalculatedMetrics {
        dti_ratio: calculate_dti_ratio(annual_income, monthly_debt),
        ltv_ratio: calculate_ltv_ratio(property_value, down_payment),
    };

    let assessment = assess_eligibility(inputs, &calculated_metrics);

    tracing::info!(
        dti_ratio = calculated_metrics.dti_ratio,
        ltv_ratio = calculated_metrics.ltv_ratio,
        credit_score = inputs.credit_score_category.map(CreditScoreCategory::as_str),
        assessment_outcome = assessment.outcome.as_str(),
        "Complete mortgage assessment performed"
    );

    Ok(AssessmentResult {
        user_inputs: inputs.clone(),
        calculated_metrics,
        assessment,
    })
}
