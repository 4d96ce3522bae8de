//! The built-in role catalog.
//!
//! The catalog is intentionally small: the broad primitive roles plus the
//! Secret Manager and KMS predefined roles the emulator's data planes need.
//! Permission lists are static so role expansion never allocates.

const OWNER: &[&str] = &[
    "secretmanager.secrets.get",
    "secretmanager.secrets.create",
    "secretmanager.secrets.update",
    "secretmanager.secrets.delete",
    "secretmanager.secrets.list",
    "secretmanager.versions.add",
    "secretmanager.versions.get",
    "secretmanager.versions.access",
    "secretmanager.versions.list",
    "secretmanager.versions.enable",
    "secretmanager.versions.disable",
    "secretmanager.versions.destroy",
    "cloudkms.keyRings.create",
    "cloudkms.keyRings.get",
    "cloudkms.keyRings.list",
    "cloudkms.cryptoKeys.create",
    "cloudkms.cryptoKeys.get",
    "cloudkms.cryptoKeys.list",
    "cloudkms.cryptoKeys.update",
    "cloudkms.cryptoKeys.encrypt",
    "cloudkms.cryptoKeys.decrypt",
    "cloudkms.cryptoKeyVersions.create",
    "cloudkms.cryptoKeyVersions.get",
    "cloudkms.cryptoKeyVersions.list",
    "cloudkms.cryptoKeyVersions.update",
    "cloudkms.cryptoKeyVersions.destroy",
];

// Owner minus the destructive verbs (*.delete, *.destroy) and keyRings.create.
const EDITOR: &[&str] = &[
    "secretmanager.secrets.get",
    "secretmanager.secrets.create",
    "secretmanager.secrets.update",
    "secretmanager.secrets.list",
    "secretmanager.versions.add",
    "secretmanager.versions.get",
    "secretmanager.versions.access",
    "secretmanager.versions.list",
    "secretmanager.versions.enable",
    "secretmanager.versions.disable",
    "cloudkms.keyRings.get",
    "cloudkms.keyRings.list",
    "cloudkms.cryptoKeys.create",
    "cloudkms.cryptoKeys.get",
    "cloudkms.cryptoKeys.list",
    "cloudkms.cryptoKeys.update",
    "cloudkms.cryptoKeys.encrypt",
    "cloudkms.cryptoKeys.decrypt",
    "cloudkms.cryptoKeyVersions.create",
    "cloudkms.cryptoKeyVersions.get",
    "cloudkms.cryptoKeyVersions.list",
    "cloudkms.cryptoKeyVersions.update",
];

const VIEWER: &[&str] = &[
    "secretmanager.secrets.get",
    "secretmanager.secrets.list",
    "secretmanager.versions.get",
    "secretmanager.versions.list",
    "cloudkms.keyRings.get",
    "cloudkms.keyRings.list",
    "cloudkms.cryptoKeys.get",
    "cloudkms.cryptoKeys.list",
    "cloudkms.cryptoKeyVersions.get",
    "cloudkms.cryptoKeyVersions.list",
];

const SECRETMANAGER_ADMIN: &[&str] = &[
    "secretmanager.secrets.get",
    "secretmanager.secrets.create",
    "secretmanager.secrets.update",
    "secretmanager.secrets.delete",
    "secretmanager.secrets.list",
    "secretmanager.versions.add",
    "secretmanager.versions.get",
    "secretmanager.versions.access",
    "secretmanager.versions.list",
    "secretmanager.versions.enable",
    "secretmanager.versions.disable",
    "secretmanager.versions.destroy",
];

const SECRETMANAGER_SECRET_ACCESSOR: &[&str] = &["secretmanager.versions.access"];

const SECRETMANAGER_SECRET_VERSION_MANAGER: &[&str] = &[
    "secretmanager.versions.add",
    "secretmanager.versions.get",
    "secretmanager.versions.list",
    "secretmanager.versions.enable",
    "secretmanager.versions.disable",
    "secretmanager.versions.destroy",
];

// keyRings.create is reserved to roles/owner.
const CLOUDKMS_ADMIN: &[&str] = &[
    "cloudkms.keyRings.get",
    "cloudkms.keyRings.list",
    "cloudkms.cryptoKeys.create",
    "cloudkms.cryptoKeys.get",
    "cloudkms.cryptoKeys.list",
    "cloudkms.cryptoKeys.update",
    "cloudkms.cryptoKeys.encrypt",
    "cloudkms.cryptoKeys.decrypt",
    "cloudkms.cryptoKeyVersions.create",
    "cloudkms.cryptoKeyVersions.get",
    "cloudkms.cryptoKeyVersions.list",
    "cloudkms.cryptoKeyVersions.update",
    "cloudkms.cryptoKeyVersions.destroy",
];

const CLOUDKMS_CRYPTO_KEY_ENCRYPTER_DECRYPTER: &[&str] =
    &["cloudkms.cryptoKeys.encrypt", "cloudkms.cryptoKeys.decrypt"];

const CLOUDKMS_VIEWER: &[&str] = &[
    "cloudkms.keyRings.get",
    "cloudkms.keyRings.list",
    "cloudkms.cryptoKeys.get",
    "cloudkms.cryptoKeys.list",
    "cloudkms.cryptoKeyVersions.get",
    "cloudkms.cryptoKeyVersions.list",
];

/// Looks up the permission list of a built-in role.
pub(crate) fn permissions(role: &str) -> Option<&'static [&'static str]> {
    match role {
        "roles/owner" => Some(OWNER),
        "roles/editor" => Some(EDITOR),
        "roles/viewer" => Some(VIEWER),
        "roles/secretmanager.admin" => Some(SECRETMANAGER_ADMIN),
        "roles/secretmanager.secretAccessor" => Some(SECRETMANAGER_SECRET_ACCESSOR),
        "roles/secretmanager.secretVersionManager" => Some(SECRETMANAGER_SECRET_VERSION_MANAGER),
        "roles/cloudkms.admin" => Some(CLOUDKMS_ADMIN),
        "roles/cloudkms.cryptoKeyEncrypterDecrypter" => {
            Some(CLOUDKMS_CRYPTO_KEY_ENCRYPTER_DECRYPTER)
        }
        "roles/cloudkms.viewer" => Some(CLOUDKMS_VIEWER),
        _ => None,
    }
}
