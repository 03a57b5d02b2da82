#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use secctx_identity::{Identity, KerberosIdentity, KerberosPrincipal, SimplePrincipal};

fn token_of(id: &dyn KerberosIdentity<SecretString>) -> Option<&str> {
    id.kerberos_token().map(ExposeSecret::expose_secret)
}

#[test]
fn kerberos_identity_through_trait_object() {
    let mut id = KerberosPrincipal::<SecretString>::new("http/web01@EXAMPLE.COM");
    assert_eq!(token_of(&id), None);

    id.set_kerberos_token(Some(SecretString::from("YIIBhgYJKoZIhvcSAQICAQBuggF1".to_owned())));
    assert_eq!(token_of(&id), Some("YIIBhgYJKoZIhvcSAQICAQBuggF1"));

    id.set_kerberos_token(None);
    assert_eq!(token_of(&id), None);
}

#[test]
fn identities_share_the_name_capability() {
    let identities: Vec<Arc<dyn Identity>> = vec![
        Arc::new(SimplePrincipal::new("alice")),
        Arc::new(KerberosPrincipal::<Vec<u8>>::new("bob@EXAMPLE.COM")),
    ];

    let names: Vec<&str> = identities.iter().map(|i| i.name()).collect();
    assert_eq!(names, ["alice", "bob@EXAMPLE.COM"]);
}
