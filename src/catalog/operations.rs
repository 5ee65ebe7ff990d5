//! The static operation table
//!
//! One entry per supported Airtable Web API capability. Paths are relative to
//! the API base (`https://api.airtable.com/v0` by default).

use super::descriptor::BodyShape as B;
use super::descriptor::HttpMethod::{self, Delete, Get, Patch, Post};
use super::descriptor::ParamKind as K;
use super::descriptor::{BodyShape, OperationDescriptor, OperationKind, ParamSpec};

/// Parameter slice with a guaranteed `'static` lifetime
macro_rules! params {
    ($($param:expr),* $(,)?) => {{
        const PARAMS: &[ParamSpec] = &[$($param),*];
        PARAMS
    }};
}

const OFFSET_CURSOR: OperationKind = OperationKind::List { cursor: "offset" };

// Shared parameters
const BASE_ID: ParamSpec = ParamSpec::path("base_id", "Base ID (starts with 'app')");
const TABLE: ParamSpec = ParamSpec::path("table_id_or_name", "Table ID (starts with 'tbl') or table name");
const TABLE_ID: ParamSpec = ParamSpec::path("table_id", "Table ID (starts with 'tbl')");
const RECORD_ID: ParamSpec = ParamSpec::path("record_id", "Record ID (starts with 'rec')");
const VIEW_ID: ParamSpec = ParamSpec::path("view_id", "View ID (starts with 'viw')");
const COMMENT_ID: ParamSpec = ParamSpec::path("comment_id", "Comment ID");
const WEBHOOK_ID: ParamSpec = ParamSpec::path("webhook_id", "Webhook ID (starts with 'ach')");
const ENTERPRISE_ID: ParamSpec = ParamSpec::path("enterprise_account_id", "Enterprise account ID");
const USER_ID: ParamSpec = ParamSpec::path("user_id", "User ID (starts with 'usr')");
const PRINCIPAL_ID: ParamSpec = ParamSpec::path("user_or_group_id", "User ID or group ID");

const INCLUDE: ParamSpec = ParamSpec::query("include", "include", K::StringList, "Additional data to include");
const OFFSET: ParamSpec = ParamSpec::query(
    "offset",
    "offset",
    K::String,
    "Cursor from a previous response's `offset` field",
);
const PAGE_SIZE: ParamSpec = ParamSpec::query("page_size", "pageSize", K::Integer, "Items per page");
const CELL_FORMAT: ParamSpec =
    ParamSpec::query("cell_format", "cellFormat", K::String, "Cell value format: 'json' or 'string'");
const FIELDS_BY_ID_QUERY: ParamSpec = ParamSpec::query(
    "return_fields_by_field_id",
    "returnFieldsByFieldId",
    K::Boolean,
    "Key fields by field ID instead of name",
);
const FIELDS_BY_ID_BODY: ParamSpec = ParamSpec::body(
    "return_fields_by_field_id",
    "returnFieldsByFieldId",
    K::Boolean,
    "Key fields by field ID instead of name",
);
const TYPECAST: ParamSpec = ParamSpec::body(
    "typecast",
    "typecast",
    K::Boolean,
    "Let the API convert string values to the field's type",
);

const fn op(
    name: &'static str,
    description: &'static str,
    method: HttpMethod,
    path: &'static str,
    kind: OperationKind,
    body: BodyShape,
    params: &'static [ParamSpec],
) -> OperationDescriptor {
    OperationDescriptor {
        name,
        description,
        method,
        path,
        kind,
        body,
        params,
        one_of: &[],
    }
}

const fn requires_one_of(mut descriptor: OperationDescriptor, names: &'static [&'static str]) -> OperationDescriptor {
    descriptor.one_of = names;
    descriptor
}

pub static OPERATIONS: &[OperationDescriptor] = &[
    // Records
    op(
        "list_records",
        "List records in a table; pass the returned `offset` back to fetch the next page",
        Get,
        "{base_id}/{table_id_or_name}",
        OFFSET_CURSOR,
        B::None,
        params![
            BASE_ID,
            TABLE,
            ParamSpec::query("fields", "fields[]", K::StringList, "Only return these fields"),
            ParamSpec::query("filter_by_formula", "filterByFormula", K::String, "Formula used to filter records"),
            ParamSpec::query("max_records", "maxRecords", K::Integer, "Maximum total records returned"),
            PAGE_SIZE,
            ParamSpec::query("sort", "sort", K::SortList, "Sort order: list of {field, direction}"),
            ParamSpec::query("view", "view", K::String, "View name or ID"),
            CELL_FORMAT,
            ParamSpec::query("time_zone", "timeZone", K::String, "Time zone for string cell format"),
            ParamSpec::query("user_locale", "userLocale", K::String, "Locale for string cell format"),
            FIELDS_BY_ID_QUERY,
            OFFSET,
        ],
    ),
    op(
        "get_record",
        "Retrieve a single record",
        Get,
        "{base_id}/{table_id_or_name}/{record_id}",
        OperationKind::SingleRecord,
        B::None,
        params![BASE_ID, TABLE, RECORD_ID, CELL_FORMAT, FIELDS_BY_ID_QUERY],
    ),
    requires_one_of(
        op(
            "create_records",
            "Create one record (`fields`) or a batch of records (`records`, at most 10)",
            Post,
            "{base_id}/{table_id_or_name}",
            OperationKind::Bulk,
            B::Object,
            params![
                BASE_ID,
                TABLE,
                ParamSpec::body("records", "records", K::ObjectList, "Records to create, each {fields: {...}}"),
                ParamSpec::body("fields", "fields", K::Object, "Field values for a single record"),
                TYPECAST,
                FIELDS_BY_ID_BODY,
            ],
        ),
        &["records", "fields"],
    ),
    op(
        "update_record",
        "Update the given fields of a single record",
        Patch,
        "{base_id}/{table_id_or_name}/{record_id}",
        OperationKind::SingleRecord,
        B::Object,
        params![
            BASE_ID,
            TABLE,
            RECORD_ID,
            ParamSpec::body("fields", "fields", K::Object, "Field values to update").required(),
            TYPECAST,
            FIELDS_BY_ID_BODY,
        ],
    ),
    op(
        "update_multiple_records",
        "Update (or upsert) a batch of records",
        Patch,
        "{base_id}/{table_id_or_name}",
        OperationKind::Bulk,
        B::Object,
        params![
            BASE_ID,
            TABLE,
            ParamSpec::body("records", "records", K::ObjectList, "Records, each {id, fields: {...}}").required(),
            TYPECAST,
            FIELDS_BY_ID_BODY,
            ParamSpec::body(
                "fields_to_merge_on",
                "performUpsert.fieldsToMergeOn",
                K::StringList,
                "Enable upsert, matching existing records on these fields",
            ),
        ],
    ),
    op(
        "delete_record",
        "Delete a single record",
        Delete,
        "{base_id}/{table_id_or_name}/{record_id}",
        OperationKind::SingleRecord,
        B::None,
        params![BASE_ID, TABLE, RECORD_ID],
    ),
    op(
        "delete_multiple_records",
        "Delete a batch of records by ID",
        Delete,
        "{base_id}/{table_id_or_name}",
        OperationKind::Bulk,
        B::None,
        params![
            BASE_ID,
            TABLE,
            ParamSpec::query("record_ids", "records[]", K::StringList, "IDs of records to delete").required(),
        ],
    ),
    // Bases
    op(
        "list_bases",
        "List all bases accessible to the connection",
        Get,
        "meta/bases",
        OFFSET_CURSOR,
        B::None,
        params![OFFSET],
    ),
    op(
        "get_base_schema",
        "Get the schema of a base: tables, fields and views",
        Get,
        "meta/bases/{base_id}/tables",
        OperationKind::Schema,
        B::None,
        params![BASE_ID, INCLUDE],
    ),
    op(
        "create_base",
        "Create a new base in a workspace",
        Post,
        "meta/bases",
        OperationKind::Schema,
        B::Object,
        params![
            ParamSpec::body("name", "name", K::String, "Base name").required(),
            ParamSpec::body("workspace_id", "workspaceId", K::String, "Workspace ID (starts with 'wsp')").required(),
            ParamSpec::body("tables", "tables", K::ObjectList, "Table definitions").required(),
        ],
    ),
    op(
        "get_base_collaborators",
        "Get base collaborators and their permissions",
        Get,
        "meta/bases/{base_id}",
        OperationKind::Schema,
        B::None,
        params![BASE_ID, INCLUDE],
    ),
    op(
        "delete_base",
        "Delete a base",
        Delete,
        "meta/bases/{base_id}",
        OperationKind::Schema,
        B::None,
        params![BASE_ID],
    ),
    // Tables
    op(
        "create_table",
        "Create a new table in a base",
        Post,
        "meta/bases/{base_id}/tables",
        OperationKind::Schema,
        B::Object,
        params![
            BASE_ID,
            ParamSpec::body("name", "name", K::String, "Table name").required(),
            ParamSpec::body("fields", "fields", K::ObjectList, "Field definitions; the first is primary").required(),
            ParamSpec::body("description", "description", K::String, "Table description"),
        ],
    ),
    op(
        "update_table",
        "Update a table's name or description",
        Patch,
        "meta/bases/{base_id}/tables/{table_id_or_name}",
        OperationKind::Schema,
        B::Object,
        params![
            BASE_ID,
            TABLE,
            ParamSpec::body("name", "name", K::String, "New table name"),
            ParamSpec::body("description", "description", K::String, "New table description"),
        ],
    ),
    // Fields
    op(
        "create_field",
        "Create a new field in a table",
        Post,
        "meta/bases/{base_id}/tables/{table_id}/fields",
        OperationKind::Schema,
        B::Object,
        params![
            BASE_ID,
            TABLE_ID,
            ParamSpec::body("name", "name", K::String, "Field name").required(),
            ParamSpec::body("type", "type", K::String, "Field type, e.g. singleLineText").required(),
            ParamSpec::body("description", "description", K::String, "Field description"),
            ParamSpec::body("options", "options", K::Object, "Type-specific field options"),
        ],
    ),
    op(
        "update_field",
        "Update a field's name or description",
        Patch,
        "meta/bases/{base_id}/tables/{table_id}/fields/{field_id}",
        OperationKind::Schema,
        B::Object,
        params![
            BASE_ID,
            TABLE_ID,
            ParamSpec::path("field_id", "Field ID (starts with 'fld')"),
            ParamSpec::body("name", "name", K::String, "New field name"),
            ParamSpec::body("description", "description", K::String, "New field description"),
        ],
    ),
    // Views
    op(
        "list_views",
        "List all views in a base",
        Get,
        "meta/bases/{base_id}/views",
        OperationKind::Schema,
        B::None,
        params![BASE_ID, INCLUDE],
    ),
    op(
        "get_view_metadata",
        "Get metadata for a view",
        Get,
        "meta/bases/{base_id}/views/{view_id}",
        OperationKind::Schema,
        B::None,
        params![BASE_ID, VIEW_ID, INCLUDE],
    ),
    op(
        "delete_view",
        "Delete a view",
        Delete,
        "meta/bases/{base_id}/views/{view_id}",
        OperationKind::Schema,
        B::None,
        params![BASE_ID, VIEW_ID],
    ),
    // Comments
    op(
        "list_comments",
        "List comments on a record, newest first",
        Get,
        "{base_id}/{table_id_or_name}/{record_id}/comments",
        OFFSET_CURSOR,
        B::None,
        params![BASE_ID, TABLE, RECORD_ID, PAGE_SIZE, OFFSET],
    ),
    op(
        "create_comment",
        "Create a comment on a record",
        Post,
        "{base_id}/{table_id_or_name}/{record_id}/comments",
        OperationKind::Action,
        B::Object,
        params![
            BASE_ID,
            TABLE,
            RECORD_ID,
            ParamSpec::body("text", "text", K::String, "Comment text").required(),
            ParamSpec::body("parent_comment_id", "parentCommentId", K::String, "Reply to this comment"),
        ],
    ),
    op(
        "update_comment",
        "Update the text of a comment",
        Patch,
        "{base_id}/{table_id_or_name}/{record_id}/comments/{comment_id}",
        OperationKind::Action,
        B::Object,
        params![
            BASE_ID,
            TABLE,
            RECORD_ID,
            COMMENT_ID,
            ParamSpec::body("text", "text", K::String, "New comment text").required(),
        ],
    ),
    op(
        "delete_comment",
        "Delete a comment",
        Delete,
        "{base_id}/{table_id_or_name}/{record_id}/comments/{comment_id}",
        OperationKind::Action,
        B::None,
        params![BASE_ID, TABLE, RECORD_ID, COMMENT_ID],
    ),
    // Webhooks
    op(
        "list_webhooks",
        "List webhooks registered on a base",
        Get,
        "bases/{base_id}/webhooks",
        OperationKind::Action,
        B::None,
        params![BASE_ID],
    ),
    op(
        "create_webhook",
        "Create a webhook on a base",
        Post,
        "bases/{base_id}/webhooks",
        OperationKind::Action,
        B::Object,
        params![
            BASE_ID,
            ParamSpec::body("notification_url", "notificationUrl", K::String, "URL pinged when payloads are ready"),
            ParamSpec::body("specification", "specification", K::Object, "Webhook specification"),
        ],
    ),
    op(
        "delete_webhook",
        "Delete a webhook",
        Delete,
        "bases/{base_id}/webhooks/{webhook_id}",
        OperationKind::Action,
        B::None,
        params![BASE_ID, WEBHOOK_ID],
    ),
    op(
        "list_webhook_payloads",
        "Poll payloads of a webhook; pass the returned `cursor` back to continue",
        Get,
        "bases/{base_id}/webhooks/{webhook_id}/payloads",
        OperationKind::List { cursor: "cursor" },
        B::None,
        params![
            BASE_ID,
            WEBHOOK_ID,
            ParamSpec::query("cursor", "cursor", K::Integer, "Cursor from a previous response"),
            ParamSpec::query("limit", "limit", K::Integer, "Maximum payloads returned"),
        ],
    ),
    op(
        "enable_disable_webhook_notifications",
        "Enable or disable notification pings for a webhook",
        Post,
        "bases/{base_id}/webhooks/{webhook_id}/enableNotifications",
        OperationKind::Action,
        B::Object,
        params![
            BASE_ID,
            WEBHOOK_ID,
            ParamSpec::body("enable", "enable", K::Boolean, "true to enable, false to disable").required(),
        ],
    ),
    op(
        "refresh_webhook",
        "Extend the expiration time of a webhook",
        Post,
        "bases/{base_id}/webhooks/{webhook_id}/refresh",
        OperationKind::Action,
        B::None,
        params![BASE_ID, WEBHOOK_ID],
    ),
    // Collaborators
    requires_one_of(
        op(
            "add_base_collaborator",
            "Add a user or group as a base collaborator",
            Post,
            "meta/bases/{base_id}/collaborators",
            OperationKind::Schema,
            B::Collaborator,
            params![
                BASE_ID,
                ParamSpec::body("user_id", "user", K::String, "User ID to add"),
                ParamSpec::body("group_id", "group", K::String, "Group ID to add"),
                ParamSpec::body(
                    "permission_level",
                    "permissionLevel",
                    K::String,
                    "none, read, comment, edit or create (default read)",
                ),
            ],
        ),
        &["user_id", "group_id"],
    ),
    op(
        "update_collaborator_base_permission",
        "Change a collaborator's permission level on a base",
        Patch,
        "meta/bases/{base_id}/collaborators/{user_or_group_id}",
        OperationKind::Schema,
        B::Object,
        params![
            BASE_ID,
            PRINCIPAL_ID,
            ParamSpec::body("permission_level", "permissionLevel", K::String, "New permission level").required(),
        ],
    ),
    op(
        "delete_base_collaborator",
        "Remove a collaborator from a base",
        Delete,
        "meta/bases/{base_id}/collaborators/{user_or_group_id}",
        OperationKind::Schema,
        B::None,
        params![BASE_ID, PRINCIPAL_ID],
    ),
    op(
        "get_workspace_collaborators",
        "Get workspace collaborators",
        Get,
        "meta/workspaces/{workspace_id}",
        OperationKind::Schema,
        B::None,
        params![ParamSpec::path("workspace_id", "Workspace ID (starts with 'wsp')"), INCLUDE],
    ),
    // User and enterprise
    op(
        "get_user_info",
        "Get the user behind the current connection",
        Get,
        "meta/whoami",
        OperationKind::Action,
        B::None,
        params![],
    ),
    op(
        "get_enterprise",
        "Get enterprise account information",
        Get,
        "meta/enterpriseAccounts/{enterprise_account_id}",
        OperationKind::Action,
        B::None,
        params![ENTERPRISE_ID, INCLUDE],
    ),
    op(
        "get_user_by_id",
        "Get an enterprise user by ID",
        Get,
        "meta/enterpriseAccounts/{enterprise_account_id}/users/{user_id}",
        OperationKind::Action,
        B::None,
        params![ENTERPRISE_ID, USER_ID, INCLUDE],
    ),
    op(
        "get_users_by_id_or_email",
        "Look up enterprise users by ID or email",
        Get,
        "meta/enterpriseAccounts/{enterprise_account_id}/users",
        OperationKind::Action,
        B::None,
        params![
            ENTERPRISE_ID,
            ParamSpec::query("user_ids", "id[]", K::StringList, "User IDs"),
            ParamSpec::query("emails", "email[]", K::StringList, "User emails"),
            INCLUDE,
        ],
    ),
    op(
        "remove_user_from_enterprise",
        "Remove a user from an enterprise account",
        Post,
        "meta/enterpriseAccounts/{enterprise_account_id}/users/{user_id}/remove",
        OperationKind::Action,
        B::Object,
        params![
            ENTERPRISE_ID,
            USER_ID,
            ParamSpec::body(
                "replacement_owner_id",
                "replacementOwnerId",
                K::String,
                "User who takes over owned workspaces",
            ),
            ParamSpec::body(
                "remove_from_descendants",
                "removeFromDescendants",
                K::Boolean,
                "Also remove from descendant enterprise accounts",
            ),
            ParamSpec::body("is_dry_run", "isDryRun", K::Boolean, "Report the effect without applying it"),
        ],
    ),
    // Shares
    op(
        "list_shares",
        "List shares of a base",
        Get,
        "meta/bases/{base_id}/shares",
        OperationKind::Schema,
        B::None,
        params![BASE_ID],
    ),
    op(
        "delete_share",
        "Delete a base share",
        Delete,
        "meta/bases/{base_id}/shares/{share_id}",
        OperationKind::Schema,
        B::None,
        params![BASE_ID, ParamSpec::path("share_id", "Share ID (starts with 'shr')")],
    ),
];
