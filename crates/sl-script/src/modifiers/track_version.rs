//! Wraps the script in statements recording each deployment in
//! `[dbo].[__DacpacVersion]`.
//!
//! Absent build/revision components are passed as `-1`, stored as NULL via
//! `NULLIF` and matched again via `ISNULL`.

use crate::context::{ModifierContext, LINE_BREAK};
use crate::error::ScriptResult;
use minijinja::{context, Environment};
use sl_core::Version;

/// Stand-in for an absent version component
pub const ABSENT_COMPONENT: i64 = -1;

/// Name of the tracking table
pub const TRACKING_TABLE: &str = "[dbo].[__DacpacVersion]";

const PROLOGUE_TEMPLATE: &str = r#"IF OBJECT_ID(N'{{ table }}', N'U') IS NULL
BEGIN
    PRINT 'Creating table {{ table }}';
    CREATE TABLE {{ table }}
    (
        DacpacVersionID INT           NOT NULL IDENTITY(1, 1),
        DacpacName      NVARCHAR(512) NOT NULL,
        Major           INT           NOT NULL,
        Minor           INT           NOT NULL,
        Build           INT           NULL,
        Revision        INT           NULL,
        DeploymentStart DATETIME2     NOT NULL,
        DeploymentEnd   DATETIME2     NULL,
        CONSTRAINT PK_DacpacVersion_DacpacVersionID PRIMARY KEY (DacpacVersionID)
    );
END
GO

PRINT 'Tracking version number for current deployment';
GO
INSERT INTO {{ table }}
       (DacpacName, Major, Minor, Build, Revision, DeploymentStart)
VALUES
       (
           N'{{ dacpac_name }}',
           {{ major }},
           {{ minor }},
           NULLIF({{ build }}, {{ absent }}),
           NULLIF({{ revision }}, {{ absent }}),
           SYSDATETIME()
       );
GO"#;

const EPILOGUE_TEMPLATE: &str = r#"PRINT 'Tracking deployment execution time for current deployment';
GO
UPDATE [dv]
   SET [dv].[DeploymentEnd] = SYSDATETIME()
  FROM {{ table }} AS [dv]
 WHERE [dv].[DacpacVersionID] = (SELECT MAX([m].[DacpacVersionID])
                                   FROM {{ table }} AS [m]
                                  WHERE [m].[DacpacName] = N'{{ dacpac_name }}'
                                    AND [m].[Major] = {{ major }}
                                    AND [m].[Minor] = {{ minor }}
                                    AND ISNULL([m].[Build], {{ absent }}) = {{ build }}
                                    AND ISNULL([m].[Revision], {{ absent }}) = {{ revision }});
GO"#;

pub(crate) fn track_dacpac_version(
    input: &str,
    ctx: &ModifierContext<'_>,
) -> ScriptResult<String> {
    ctx.require_project_name()?;
    let sql_target_name = ctx.project.sql_target_name()?;
    let version = ctx.project.dac_version()?;

    let (prologue, epilogue) = render_tracking(sql_target_name, version)?;
    log::debug!("Tracking DACPAC version {version} for {sql_target_name}");
    Ok(format!(
        "{prologue}{LINE_BREAK}{LINE_BREAK}{input}{LINE_BREAK}{epilogue}{LINE_BREAK}"
    ))
}

/// Render the prologue and epilogue for a target and version
pub fn render_tracking(sql_target_name: &str, version: &Version) -> ScriptResult<(String, String)> {
    let env = Environment::new();
    let values = context! {
        table => TRACKING_TABLE,
        dacpac_name => sql_target_name.replace('\'', "''"),
        major => version.major(),
        minor => version.minor(),
        build => version.build().map_or(ABSENT_COMPONENT, i64::from),
        revision => version.revision().map_or(ABSENT_COMPONENT, i64::from),
        absent => ABSENT_COMPONENT,
    };

    let prologue = env.render_str(PROLOGUE_TEMPLATE, &values)?;
    let epilogue = env.render_str(EPILOGUE_TEMPLATE, &values)?;
    Ok((with_line_breaks(&prologue), with_line_breaks(&epilogue)))
}

fn with_line_breaks(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(LINE_BREAK)
}

#[cfg(test)]
#[path = "track_version_test.rs"]
mod tests;
