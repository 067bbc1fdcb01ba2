//! Serde roundtrip and JsonSchema validation tests for all entity types.

use chrono::{TimeZone, Utc};
use schemars::schema_for;
use cooper_core::audit_detail::{InteractionLoggedDetail, OwnershipTransferredDetail};
use cooper_core::entities::*;
use cooper_core::enums::*;
use cooper_core::identity::ActingUser;
use cooper_core::policy::ClaimStatus;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    user_roundtrip,
    User,
    User {
        id: "usr-a3f8b2c1".into(),
        email: "ana@coopercard.com.br".into(),
        name: Some("Ana".into()),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    opportunity_roundtrip,
    Opportunity,
    Opportunity {
        id: "opp-a3f8b2c1".into(),
        cnpj: "12345678000190".into(),
        company_name: "Padaria Estrela LTDA".into(),
        owner_id: "usr-a3f8b2c1".into(),
        status: PipelineStatus::Negotiation,
        temperature: Some(Temperature::Hot),
        product: Some(Product::FourthLine),
        estimated_value: 15_000.5,
        created_at: Utc::now(),
        last_interaction_at: Utc::now(),
        revision: 3,
    }
);

roundtrip_and_validate!(
    opportunity_without_optionals_roundtrip,
    Opportunity,
    Opportunity {
        id: "opp-00000002".into(),
        cnpj: "98765432000110".into(),
        company_name: "Mercado Sol".into(),
        owner_id: "usr-00000001".into(),
        status: PipelineStatus::Qualification,
        temperature: None,
        product: None,
        estimated_value: 0.0,
        created_at: Utc::now(),
        last_interaction_at: Utc::now(),
        revision: 0,
    }
);

roundtrip_and_validate!(
    interaction_roundtrip,
    Interaction,
    Interaction {
        id: "int-a3f8b2c1".into(),
        opportunity_id: "opp-a3f8b2c1".into(),
        kind: InteractionKind::Meeting,
        notes: Some("Apresentação do cartão".into()),
        occurred_at: Utc.with_ymd_and_hms(2025, 1, 10, 14, 0, 0).unwrap(),
        logged_by: "usr-a3f8b2c1".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    interaction_other_kind_roundtrip,
    Interaction,
    Interaction {
        id: "int-00000002".into(),
        opportunity_id: "opp-a3f8b2c1".into(),
        kind: InteractionKind::Other("whatsapp".into()),
        notes: None,
        occurred_at: Utc::now(),
        logged_by: "usr-a3f8b2c1".into(),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    new_opportunity_roundtrip,
    NewOpportunity,
    NewOpportunity {
        status: PipelineStatus::Proposal,
        product: Some(Product::Cooper),
        estimated_value: 1200.0,
        ..NewOpportunity::new("12.345.678/0001-90", "Acme")
    }
);

roundtrip_and_validate!(
    new_interaction_roundtrip,
    NewInteraction,
    NewInteraction::new(InteractionKind::Call).notes("follow-up")
);

roundtrip_and_validate!(
    audit_entry_roundtrip,
    AuditEntry,
    AuditEntry {
        id: "aud-a3f8b2c1".into(),
        actor_id: Some("usr-a3f8b2c1".into()),
        entity_type: EntityType::Opportunity,
        entity_id: "opp-a3f8b2c1".into(),
        action: AuditAction::OwnershipTransferred,
        detail: Some(serde_json::json!({"from_owner_id": "usr-1", "to_owner_id": "usr-2"})),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    ownership_detail_roundtrip,
    OwnershipTransferredDetail,
    OwnershipTransferredDetail {
        from_owner_id: "usr-1".into(),
        to_owner_id: "usr-2".into(),
        days_since_interaction: 120,
    }
);

roundtrip_and_validate!(
    interaction_detail_roundtrip,
    InteractionLoggedDetail,
    InteractionLoggedDetail {
        interaction_id: "int-1".into(),
        occurred_at: Utc::now(),
        previous_last_interaction_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    acting_user_roundtrip,
    ActingUser,
    ActingUser {
        user_id: "usr-1".into(),
        email: "ana@coopercard.com.br".into(),
    }
);

roundtrip_and_validate!(
    claim_status_roundtrip,
    ClaimStatus,
    ClaimStatus {
        opportunity_id: "opp-1".into(),
        owner_id: "usr-1".into(),
        owned_by_actor: false,
        days_since_interaction: 91,
        free_to_claim: true,
        claimable_at: Some(Utc::now()),
    }
);

#[test]
fn opportunity_json_uses_portuguese_labels() {
    let opp = Opportunity {
        id: "opp-1".into(),
        cnpj: "12345678000190".into(),
        company_name: "Acme".into(),
        owner_id: "usr-1".into(),
        status: PipelineStatus::Negotiation,
        temperature: Some(Temperature::Boiling),
        product: Some(Product::Custom),
        estimated_value: 10.0,
        created_at: Utc::now(),
        last_interaction_at: Utc::now(),
        revision: 0,
    };
    let json = serde_json::to_value(&opp).unwrap();
    assert_eq!(json["status"], "Negociação");
    assert_eq!(json["temperature"], "Fervendo");
    assert_eq!(json["product"], "Personalizados");
}
