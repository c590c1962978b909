//! Properties every validator must hold: deterministic output and
//! non-empty messages on failure.

use lendesk_validation::*;

type Check = fn(&str) -> ValidationResult;

fn all_validators() -> Vec<(&'static str, Check)> {
    vec![
        ("required", validate_required as Check),
        ("letters", validate_letters as Check),
        ("min_length", (|v: &str| validate_min_length(v, 3)) as Check),
        ("length", (|v: &str| validate_length(v, 1, 60)) as Check),
        ("phone", validate_phone as Check),
        ("carnet", (|v: &str| validate_carnet(v, 6)) as Check),
        ("carnet_digits", (|v: &str| validate_carnet_digits(v, "5A")) as Check),
        ("complemento", validate_complemento as Check),
        ("email", validate_email as Check),
        ("email_extension", validate_email_extension as Check),
        ("email_provider", validate_email_provider as Check),
        ("password", (|v: &str| validate_password(v, 8)) as Check),
        ("income", validate_income as Check),
        ("loan_amount", validate_loan_amount as Check),
        ("term_months", validate_term_months as Check),
    ]
}

const SAMPLES: &[&str] = &[
    "",
    " ",
    "a",
    "Ana María",
    "71234567",
    "59999999",
    "1234567K",
    "5A",
    "ana@gmail.com",
    "ana@empresa.xyz",
    "Abcdef1!",
    "100",
    "99",
    "abc",
    "-1",
    "12.5",
    "ñandú🙂",
];

#[test]
fn validators_are_deterministic() {
    for (name, check) in all_validators() {
        for sample in SAMPLES {
            assert_eq!(
                check(sample),
                check(sample),
                "{} is not deterministic for {:?}",
                name,
                sample
            );
        }
    }
}

#[test]
fn failures_carry_a_message() {
    for (name, check) in all_validators() {
        for sample in SAMPLES {
            if let Err(message) = check(sample) {
                assert!(
                    !message.trim().is_empty(),
                    "{} returned an empty message for {:?}",
                    name,
                    sample
                );
            }
        }
    }
}
