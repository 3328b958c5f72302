use super::common::*;
use crate::qualification::domain::{ApplicantProfile, CreditAssessment, Outcome, ScoreBand};
use crate::qualification::error::QualificationError;
use crate::qualification::session::{PrequalificationSession, WizardAnswer, WizardStep};

fn answered(answers: Vec<WizardAnswer>) -> PrequalificationSession {
    let engine = engine();
    let mut session = PrequalificationSession::new();
    for answer in answers {
        session.apply(&engine, answer).expect("answer accepted");
    }
    session
}

#[test]
fn walks_every_step_for_a_flagged_applicant() {
    let engine = engine();
    let mut session = PrequalificationSession::new();
    let script = [
        (WizardStep::EmploymentType, WizardAnswer::EmploymentType("ET_NLS92".to_string())),
        (WizardStep::RentResponsibility, WizardAnswer::RentResponsibility(true)),
        (WizardStep::Residency, WizardAnswer::Residency(true)),
        (WizardStep::CreditReport, WizardAnswer::CreditReport(true)),
        (WizardStep::ScoreBand, WizardAnswer::ScoreBand(ScoreBand::Excellent)),
        (WizardStep::ExtraDeposit, WizardAnswer::ExtraDeposit(true)),
    ];

    for (expected_step, answer) in script {
        let progress = session.next_step(&engine).expect("progress");
        assert_eq!(progress.step, expected_step);
        assert!(progress.outcome.is_none());
        session.apply(&engine, answer).expect("answer accepted");
    }

    let progress = session.next_step(&engine).expect("progress");
    assert_eq!(progress.step, WizardStep::Complete);
    assert_eq!(progress.outcome, Some(flag(461)));
}

#[test]
fn suggests_rent_responsibility_from_the_liability_bucket() {
    let engine = engine();
    let overridden = answered(vec![WizardAnswer::EmploymentType("ET_NLS27".to_string())]);
    let progress = overridden.next_step(&engine).expect("progress");
    assert_eq!(progress.step, WizardStep::RentResponsibility);
    assert_eq!(progress.suggested_rent_responsible, Some(false));

    let regular = answered(vec![WizardAnswer::EmploymentType("ET_NLS28".to_string())]);
    let progress = regular.next_step(&engine).expect("progress");
    assert_eq!(progress.suggested_rent_responsible, Some(true));
}

#[test]
fn skips_deposit_question_for_auto_qualifying_bands() {
    let session = answered(vec![
        WizardAnswer::EmploymentType("ET_NLS92".to_string()),
        WizardAnswer::RentResponsibility(true),
        WizardAnswer::Residency(true),
        WizardAnswer::CreditReport(true),
        WizardAnswer::ScoreBand(ScoreBand::Good),
    ]);
    let progress = session.next_step(&engine()).expect("progress");
    assert_eq!(progress.step, WizardStep::Complete);
    assert_eq!(progress.outcome, Some(Outcome::AutoQualify));
}

#[test]
fn skips_credit_questions_outside_canada() {
    let session = answered(vec![
        WizardAnswer::EmploymentType("ET_NLS105".to_string()),
        WizardAnswer::RentResponsibility(true),
        WizardAnswer::Residency(false),
    ]);
    let engine = engine();
    let progress = session.next_step(&engine).expect("progress");
    assert_eq!(progress.step, WizardStep::ExtraDeposit);

    let mut session = session;
    session
        .apply(&engine, WizardAnswer::ExtraDeposit(false))
        .expect("answer accepted");
    let progress = session.next_step(&engine).expect("progress");
    assert_eq!(progress.outcome, Some(flag(564)));
}

#[test]
fn declining_the_report_clears_a_previous_band() {
    let session = answered(vec![
        WizardAnswer::EmploymentType("ET_NLS92".to_string()),
        WizardAnswer::RentResponsibility(false),
        WizardAnswer::Residency(true),
        WizardAnswer::CreditReport(true),
        WizardAnswer::ScoreBand(ScoreBand::Poor),
        WizardAnswer::CreditReport(false),
    ]);
    assert_eq!(session.credit_score_band, None);
    let progress = session.next_step(&engine()).expect("progress");
    assert_eq!(progress.outcome, Some(Outcome::AutoQualify));
}

#[test]
fn completed_session_matches_direct_resolution() {
    let engine = engine();
    let session = answered(vec![
        WizardAnswer::EmploymentType("ET_NLS50".to_string()),
        WizardAnswer::RentResponsibility(true),
        WizardAnswer::Residency(true),
        WizardAnswer::CreditReport(true),
        WizardAnswer::ScoreBand(ScoreBand::Fair),
        WizardAnswer::ExtraDeposit(false),
    ]);
    let direct = engine
        .resolve(
            &ApplicantProfile::new("ET_NLS50", true, false),
            &CreditAssessment::reported(ScoreBand::Fair, Some(false)),
        )
        .expect("resolves");
    assert_eq!(session.next_step(&engine).expect("progress").outcome, Some(direct));
}

#[test]
fn unknown_codes_are_rejected_when_answered() {
    let mut session = PrequalificationSession::new();
    match session.apply(&engine(), WizardAnswer::EmploymentType("ET_NLS0".to_string())) {
        Err(QualificationError::InvalidEmploymentCode { code }) => assert_eq!(code, "ET_NLS0"),
        other => panic!("expected invalid employment code, got {other:?}"),
    }
    assert!(session.employment_type_code.is_none());
}

#[test]
fn answers_deserialize_from_wizard_payloads() {
    let answer: WizardAnswer =
        serde_json::from_str(r#"{"step": "score_band", "value": "725-760"}"#).expect("parses");
    assert_eq!(answer, WizardAnswer::ScoreBand(ScoreBand::VeryGood));
}
