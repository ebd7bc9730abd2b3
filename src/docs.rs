use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use schoolgate_models::{
    Action, FeatureKey, FeaturePermission, RegistryName, RoleKey,
};

use crate::modules::access::model::{
    FeatureAccess, MyAccessResponse, RegistrySections, SectionAccess, SectionVisibility,
};
use crate::modules::admin_access::model::{
    CatalogResponse, CommitResponse, PartialCommitResponse, RegistryCatalog, RoleCatalog,
    SessionView, SetAllDto, SetPermissionDto, SetSectionDto,
};
use crate::modules::system::controller::{ErrorResponse, HealthResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::access::controller::get_my_access,
        crate::modules::access::controller::get_feature_access,
        crate::modules::access::controller::get_section_access,
        crate::modules::admin_access::controller::get_catalog,
        crate::modules::admin_access::controller::enter_session,
        crate::modules::admin_access::controller::get_session,
        crate::modules::admin_access::controller::rollback_session,
        crate::modules::admin_access::controller::set_permission,
        crate::modules::admin_access::controller::set_all_for_role,
        crate::modules::admin_access::controller::set_view_only_for_role,
        crate::modules::admin_access::controller::set_section,
        crate::modules::admin_access::controller::restore_defaults,
        crate::modules::admin_access::controller::commit_session,
        crate::modules::system::controller::health,
    ),
    components(
        schemas(
            RoleKey,
            FeatureKey,
            Action,
            FeaturePermission,
            RegistryName,
            FeatureAccess,
            SectionAccess,
            SectionVisibility,
            RegistrySections,
            MyAccessResponse,
            SetPermissionDto,
            SetAllDto,
            SetSectionDto,
            SessionView,
            CommitResponse,
            PartialCommitResponse,
            RoleCatalog,
            RegistryCatalog,
            CatalogResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Access", description = "Access decisions for the calling role"),
        (name = "Access Administration", description = "Edit sessions over the access configuration"),
        (name = "System", description = "Liveness")
    ),
    info(
        title = "Schoolgate API",
        version = "0.1.0",
        description = "Role-scoped feature access and section visibility for the school console.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
