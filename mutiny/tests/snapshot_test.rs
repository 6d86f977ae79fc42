//! Wire-format snapshots of generated request bodies

use mutiny::{CandidateSet, CandidateValue, FieldCase, FixtureGenerator, Payload, Selection};

#[derive(Clone, Payload)]
struct Withdrawal {
    country_code: CandidateSet,
    currency: CandidateSet,
    bank_account: CandidateSet,
    amount: u64,
}

fn withdrawal() -> Withdrawal {
    Withdrawal {
        country_code: CandidateSet::new()
            .pass(["SE"])
            .fail(["FEK"])
            .erroneous(vec![CandidateValue::from("&nbsp;"), CandidateValue::from(true)]),
        currency: CandidateSet::new().pass(["EUR", "SEK"]).fail(["DKK"]),
        bank_account: CandidateSet::new().pass([CandidateValue::raw(
            r#"{"type":"iban","account_number":"SE4550000000058398257466"}"#,
        )]),
        amount: 100,
    }
}

fn bodies(generator: &FixtureGenerator, payload: &Withdrawal) -> String {
    generator
        .generate(payload)
        .unwrap()
        .iter()
        .filter_map(|fixture| fixture.body_str().map(str::to_string))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_pass_bodies() {
    insta::assert_snapshot!(bodies(&FixtureGenerator::new(), &withdrawal()), @r#"
    {"amount":100,"bank_account":{"type":"iban","account_number":"SE4550000000058398257466"},"country_code":"SE","currency":"EUR"}
    {"amount":100,"bank_account":{"type":"iban","account_number":"SE4550000000058398257466"},"country_code":"SE","currency":"SEK"}
    "#);
}

#[test]
fn test_erroneous_bodies_in_camel_case() {
    let payload = withdrawal()
        .select_all([
            ("country_code", Selection::Erroneous),
            ("currency", Selection::Fail),
        ])
        .unwrap();
    let generator = FixtureGenerator::new().config(
        mutiny::GenerationConfig {
            field_formatter: FieldCase::Camel.formatter(),
            ..Default::default()
        },
    );

    insta::assert_snapshot!(bodies(&generator, &payload), @r#"
    {"amount":100,"bankAccount":{"type":"iban","account_number":"SE4550000000058398257466"},"countryCode":"&nbsp;","currency":"DKK"}
    {"amount":100,"bankAccount":{"type":"iban","account_number":"SE4550000000058398257466"},"countryCode":true,"currency":"DKK"}
    "#);
}
