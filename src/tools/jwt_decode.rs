//! JWT decoder with optional signature verification.
//!
//! Decoding only needs Base64URL + JSON; the secret (or public key) is only
//! used when the caller asks for verification.

use std::str::FromStr;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{Tool, ToolError};

const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtInput {
    pub token: String,
    /// HMAC secret, or a PEM public key for RSA/EC/EdDSA tokens.
    pub secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimTimes {
    pub issued_at: Option<String>,
    pub expires_at: Option<String>,
    pub not_before: Option<String>,
    /// `None` when the token has no `exp` claim.
    pub expired: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtOutput {
    pub header: JsonValue,
    pub payload: JsonValue,
    pub signature: String,
    pub algorithm: Option<String>,
    pub claims: ClaimTimes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
}

pub struct JwtTool;

impl Tool for JwtTool {
    const SLUG: &'static str = "jwt";
    const STORAGE_KEY: &'static str = "jwtDecoder";
    const TITLE: &'static str = "JWT Decoder";
    const DESCRIPTION: &'static str =
        "Inspect the header and payload of a JSON Web Token and optionally verify its signature.";

    type Input = JwtInput;
    type Output = JwtOutput;

    fn run(input: &JwtInput) -> Result<JwtOutput, ToolError> {
        decode_at(input, Utc::now())
    }
}

/// Decode (and maybe verify) a token, judging expiry against `now`.
pub fn decode_at(input: &JwtInput, now: DateTime<Utc>) -> Result<JwtOutput, ToolError> {
    let token = input.token.trim();
    let segments: Vec<&str> = token.split('.').collect();
    let [header_b64, payload_b64, signature] = segments.as_slice() else {
        return Err(ToolError::invalid("Invalid JWT format"));
    };

    let header = decode_segment(header_b64, "header")?;
    let payload = decode_segment(payload_b64, "payload")?;
    let algorithm = header
        .get("alg")
        .and_then(JsonValue::as_str)
        .map(str::to_string);

    let verification = (!input.secret.is_empty())
        .then(|| verify(token, algorithm.as_deref(), &input.secret));

    Ok(JwtOutput {
        claims: claim_times(&payload, now),
        header,
        payload,
        signature: (*signature).to_string(),
        algorithm,
        verification,
    })
}

fn decode_segment(segment: &str, part: &str) -> Result<JsonValue, ToolError> {
    let bytes = SEGMENT_ENGINE
        .decode(segment)
        .map_err(|_| ToolError::invalid(format!("Invalid JWT format: {part} is not Base64URL")))?;
    let value: JsonValue = serde_json::from_slice(&bytes)
        .map_err(|_| ToolError::invalid(format!("Invalid JWT format: {part} is not JSON")))?;
    if !value.is_object() {
        return Err(ToolError::invalid(format!(
            "Invalid JWT format: {part} is not a JSON object"
        )));
    }
    Ok(value)
}

fn claim_times(payload: &JsonValue, now: DateTime<Utc>) -> ClaimTimes {
    let time = |claim: &str| -> Option<DateTime<Utc>> {
        let secs = payload.get(claim)?.as_f64()?;
        #[allow(clippy::cast_possible_truncation)]
        DateTime::from_timestamp(secs.trunc() as i64, 0)
    };
    let exp = time("exp");
    ClaimTimes {
        issued_at: time("iat").map(|t| t.to_rfc3339()),
        expires_at: exp.map(|t| t.to_rfc3339()),
        not_before: time("nbf").map(|t| t.to_rfc3339()),
        expired: exp.map(|t| t <= now),
    }
}

/// Signature check only: expiry, audience and friends are reported separately.
fn verify(token: &str, alg: Option<&str>, secret: &str) -> Verification {
    let result = alg
        .ok_or_else(|| "Token header has no `alg`".to_string())
        .and_then(|alg| {
            Algorithm::from_str(alg).map_err(|_| format!("Unsupported algorithm `{alg}`"))
        })
        .and_then(|alg| {
            let key = decoding_key(alg, secret)?;
            let mut validation = Validation::new(alg);
            validation.required_spec_claims.clear();
            validation.validate_exp = false;
            validation.validate_nbf = false;
            validation.validate_aud = false;
            jsonwebtoken::decode::<JsonValue>(token, &key, &validation)
                .map(|_| ())
                .map_err(|e| format!("Invalid signature: {e}"))
        });

    match result {
        Ok(()) => Verification {
            valid: true,
            message: "Signature verified".to_string(),
        },
        Err(message) => Verification {
            valid: false,
            message,
        },
    }
}

fn decoding_key(alg: Algorithm, secret: &str) -> Result<DecodingKey, String> {
    let pem = secret.as_bytes();
    let key = match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            return Ok(DecodingKey::from_secret(pem));
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(pem),
        #[allow(unreachable_patterns)]
        other => return Err(format!("Unsupported algorithm `{other:?}`")),
    };
    key.map_err(|e| format!("Invalid public key: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    /// The well-known HS256 sample token, signed with `your-256-bit-secret`.
    const SAMPLE: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
        eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
        SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

    fn input(token: &str, secret: &str) -> JwtInput {
        JwtInput {
            token: token.to_string(),
            secret: secret.to_string(),
        }
    }

    #[test]
    fn test_decode_without_secret() {
        let out = JwtTool::run(&input(SAMPLE, "")).unwrap();
        assert_eq!(out.header, json!({ "alg": "HS256", "typ": "JWT" }));
        assert_eq!(out.payload["sub"], "1234567890");
        assert_eq!(out.payload["name"], "John Doe");
        assert_eq!(out.algorithm.as_deref(), Some("HS256"));
        assert_eq!(out.signature, "SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c");
        assert_eq!(
            out.claims.issued_at.as_deref(),
            Some("2018-01-18T01:30:22+00:00")
        );
        assert_eq!(out.claims.expired, None);
        assert!(out.verification.is_none());
    }

    #[test]
    fn test_verify_sample() {
        let out = JwtTool::run(&input(SAMPLE, "your-256-bit-secret")).unwrap();
        assert!(out.verification.unwrap().valid);

        let out = JwtTool::run(&input(SAMPLE, "wrong")).unwrap();
        let verification = out.verification.unwrap();
        assert!(!verification.valid);
        assert!(verification.message.starts_with("Invalid signature"));
    }

    #[test]
    fn test_expiry() {
        let claims = json!({ "sub": "a", "exp": 1_700_000_000, "nbf": 1_600_000_000 });
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"s3cret"),
        )
        .unwrap();

        let before = DateTime::from_timestamp(1_650_000_000, 0).unwrap();
        let after = DateTime::from_timestamp(1_750_000_000, 0).unwrap();

        let out = decode_at(&input(&token, "s3cret"), before).unwrap();
        assert_eq!(out.claims.expired, Some(false));
        assert_eq!(
            out.claims.expires_at.as_deref(),
            Some("2023-11-14T22:13:20+00:00")
        );
        assert!(out.claims.not_before.is_some());
        assert!(out.verification.unwrap().valid);

        // Verification does not enforce expiry
        let out = decode_at(&input(&token, "s3cret"), after).unwrap();
        assert_eq!(out.claims.expired, Some(true));
        assert!(out.verification.unwrap().valid);
    }

    #[test]
    fn test_invalid_format() {
        for token in ["", "abc", "a.b", "a.b.c.d"] {
            let err = JwtTool::run(&input(token, "")).unwrap_err();
            assert!(err.to_string().starts_with("Invalid JWT format"), "{token}");
        }
        let err = JwtTool::run(&input("!!!.e30.sig", "")).unwrap_err();
        assert!(err.to_string().contains("header"));

        // `e30` is `{}`; `WzFd` is `[1]`
        assert!(JwtTool::run(&input("e30.e30.", "")).is_ok());
        assert!(JwtTool::run(&input("e30.WzFd.", "")).is_err());
    }

    #[test]
    fn test_unsupported_algorithm() {
        // {"alg":"none"} . {}
        let out = JwtTool::run(&input("eyJhbGciOiJub25lIn0.e30.", "secret")).unwrap();
        let verification = out.verification.unwrap();
        assert!(!verification.valid);
        assert_eq!(verification.message, "Unsupported algorithm `none`");
    }
}
