//! Generates every erroneous country-code body for a withdrawal request
//!
//! Run with: cargo run --example withdrawal

use mutiny::format::to_camel_case;
use mutiny::{CandidateSet, CandidateValue, FixtureGenerator, Payload, Selection};

#[derive(Clone, Payload)]
struct Withdrawal {
    country_code: CandidateSet,
    currency: CandidateSet,
    bank_account: CandidateSet,
    amount: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let payload = Withdrawal {
        country_code: CandidateSet::new()
            .pass(["SE"])
            .fail(["FEK"])
            .erroneous(vec![
                CandidateValue::from("&nbsp;"),
                CandidateValue::from(true),
                CandidateValue::from(123),
            ]),
        currency: CandidateSet::new().pass(["EUR", "SEK"]).fail(["DKK"]),
        bank_account: CandidateSet::new().pass([CandidateValue::raw(
            r#"{"type":"iban","account_number":"SE4550000000058398257466"}"#,
        )]),
        amount: 100,
    };

    let generator = FixtureGenerator::new().field_formatter(to_camel_case);

    for selection in [Selection::Pass, Selection::Erroneous, Selection::Null] {
        let variant = payload.select("country_code", selection)?;
        let fixtures = generator.generate(&variant)?;
        println!("country_code = {} ({} fixtures)", selection, fixtures.len());
        for fixture in &fixtures {
            println!("  {}", fixture.body_str().unwrap_or("<binary>"));
        }
    }

    Ok(())
}
