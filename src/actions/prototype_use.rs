//! `prototype use`: instantiate a prototype as a new component.
//!
//! The first argument names the prototype. Everything after it is parsed
//! against the prototype's own flag set, so `--image` only exists for
//! prototypes that declare an `image` parameter:
//!
//! ```text
//! stencil prototype use single-port-deployment web --image=nginx --containerPort=80
//! stencil prototype use configmap settings yaml --values-file=settings.env
//! ```
//!
//! The remaining positionals are `<componentName> [templateType]`. Without a
//! template type the prototype's own type is used.

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{OPTION_ARGUMENTS, Options};
use crate::app::App;
use crate::component::{ComponentManager, FsManager, split_component_name};
use crate::config::GlobalConfig;
use crate::constants::OPTION_NAME;
use crate::core::StencilError;
use crate::prototype::{BoundFlags, Catalog, Prototype, TemplateType, resolve_values};
use crate::templating::{Renderer, TemplateRenderer};

/// Instantiates a prototype as a component.
pub struct PrototypeUse {
    app: App,
    config: GlobalConfig,
    args: Vec<String>,
    catalog: Option<Catalog>,
    renderer: Box<dyn Renderer>,
    manager: Box<dyn ComponentManager>,
}

impl std::fmt::Debug for PrototypeUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrototypeUse").field("app", &self.app.name()).field("args", &self.args).finish()
    }
}

impl PrototypeUse {
    /// Build the action from `app`, `arguments` and an optional `config`.
    ///
    /// # Errors
    ///
    /// Fails if a required option is missing or has the wrong type.
    pub fn new(options: Options) -> Result<Self, StencilError> {
        let mut loader = options.loader();
        Ok(Self {
            app: loader.app()?,
            config: loader.optional_config()?,
            args: loader.strings(OPTION_ARGUMENTS)?,
            catalog: None,
            renderer: Box::new(TemplateRenderer::new()),
            manager: Box::new(FsManager),
        })
    }

    /// Use `catalog` instead of loading one for the app.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Replace the renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Replace the component manager.
    #[must_use]
    pub fn with_manager(mut self, manager: Box<dyn ComponentManager>) -> Self {
        self.manager = manager;
        self
    }

    /// Run the action. Returns the new component's path, or `None` when only
    /// help was requested.
    ///
    /// # Errors
    ///
    /// Fails if the prototype cannot be resolved, flags or values are invalid,
    /// rendering fails, or the component cannot be created.
    pub fn run(&self) -> Result<Option<PathBuf>> {
        let Some(query) = self.args.first() else {
            return Err(StencilError::MissingArgument {
                name: "prototype".to_string(),
            }
            .into());
        };

        let loaded;
        let catalog = match &self.catalog {
            Some(catalog) => catalog,
            None => {
                loaded = Catalog::for_app(&self.app, &self.config)?;
                &loaded
            }
        };
        let proto = catalog.find_unique(query)?;
        tracing::debug!("Resolved prototype '{}' to {}", query, proto.name);

        let Some(mut flags) = BoundFlags::parse(proto, "use", &self.args)? else {
            return Ok(None);
        };

        let (component_name, template_type) = component_target(proto, flags.positionals())?;
        let (_, leaf) = split_component_name(&component_name);
        if flags.get_or_empty(OPTION_NAME).is_empty() {
            flags.set(OPTION_NAME, leaf);
        }

        let params = resolve_values(proto, &flags)?;
        let text = self.renderer.render(proto, template_type, &params, leaf)?;

        let path = self
            .manager
            .create(&self.app, &component_name, &text, &params, template_type)
            .context("create component")?;
        Ok(Some(path))
    }
}

/// Interpret the positionals `<prototype> <componentName> [templateType]`.
fn component_target(proto: &Prototype, positionals: &[String]) -> Result<(String, TemplateType), StencilError> {
    match positionals {
        [] | [_] => Err(StencilError::MissingArgument {
            name: "componentName".to_string(),
        }),
        [_, component] => Ok((component.clone(), proto.template_type)),
        [_, component, template_type] => Ok((component.clone(), template_type.parse()?)),
        _ => Err(StencilError::TooManyArguments {
            usage: "takes a prototype name and a component name".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::OPTION_APP;
    use crate::component::{Component, Namespace};
    use crate::prototype::QuotedValues;
    use crate::test_utils::TestApp;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Created {
        name: String,
        text: String,
        params: QuotedValues,
        template_type: TemplateType,
    }

    #[derive(Default, Clone)]
    struct RecordingManager {
        created: Rc<RefCell<Vec<Created>>>,
    }

    impl ComponentManager for RecordingManager {
        fn create(
            &self,
            app: &App,
            name: &str,
            text: &str,
            params: &QuotedValues,
            template_type: TemplateType,
        ) -> Result<PathBuf> {
            self.created.borrow_mut().push(Created {
                name: name.to_string(),
                text: text.to_string(),
                params: params.clone(),
                template_type,
            });
            Ok(app.components_dir().join(name))
        }

        fn namespace(&self, app: &App, name: &str) -> Result<Namespace> {
            Ok(Namespace::new(app, name))
        }

        fn resolve_path(&self, _app: &App, query: &str) -> Result<(Namespace, Component)> {
            Err(StencilError::ComponentNotFound {
                name: query.to_string(),
            }
            .into())
        }
    }

    struct EchoRenderer;

    impl Renderer for EchoRenderer {
        fn render(
            &self,
            proto: &Prototype,
            template_type: TemplateType,
            params: &QuotedValues,
            component: &str,
        ) -> Result<String, StencilError> {
            Ok(format!("{} {template_type} {component} {}", proto.name, params.len()))
        }
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    fn action(test_app: &TestApp, raw: &[&str]) -> (PrototypeUse, RecordingManager) {
        let manager = RecordingManager::default();
        let action = PrototypeUse::new(
            Options::new().with(OPTION_APP, test_app.app.clone()).with(OPTION_ARGUMENTS, args(raw)),
        )
        .unwrap()
        .with_catalog(Catalog::system().unwrap())
        .with_renderer(Box::new(EchoRenderer))
        .with_manager(Box::new(manager.clone()));
        (action, manager)
    }

    #[test]
    fn test_use_deployment_defaults_name_to_component() {
        let test_app = TestApp::new("guestbook");
        let (action, manager) = action(
            &test_app,
            &["single-port-deployment", "myDeployment", "--image=nginx", "--containerPort=80"],
        );

        let path = action.run().unwrap().unwrap();
        assert_eq!(path, test_app.app.components_dir().join("myDeployment"));

        let created = manager.created.borrow();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, "myDeployment");
        assert_eq!(created[0].template_type, TemplateType::Jsonnet);
        assert_eq!(created[0].text, "io.stencil.pkg.single-port-deployment jsonnet myDeployment 4");

        let expected: QuotedValues = [
            ("containerPort", "80"),
            ("image", "\"nginx\""),
            ("name", "\"myDeployment\""),
            ("replicas", "1"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(created[0].params, expected);
    }

    #[test]
    fn test_use_explicit_name_and_template_type() {
        let test_app = TestApp::new("guestbook");
        let (action, manager) = action(
            &test_app,
            &["configmap", "apps/settings", "yaml", "--name=app-settings", "--value=x"],
        );
        action.run().unwrap();

        let created = manager.created.borrow();
        assert_eq!(created[0].name, "apps/settings");
        assert_eq!(created[0].template_type, TemplateType::Yaml);
        assert_eq!(created[0].params["name"], "\"app-settings\"");
        assert_eq!(created[0].text, "io.stencil.pkg.configmap yaml settings 4");
    }

    #[test]
    fn test_use_argument_errors() {
        let test_app = TestApp::new("guestbook");

        let (missing, _) = action(&test_app, &["single-port-deployment"]);
        let err = missing.run().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StencilError>(),
            Some(StencilError::MissingArgument { name }) if name == "componentName"
        ));

        let (too_many, _) = action(&test_app, &["configmap", "a", "yaml", "extra"]);
        let err = too_many.run().unwrap_err();
        assert!(err.to_string().contains("too many arguments"));

        let (bad_type, _) = action(&test_app, &["configmap", "a", "toml"]);
        let err = bad_type.run().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StencilError>(),
            Some(StencilError::InvalidTemplateType { .. })
        ));

        let (no_proto, _) = action(&test_app, &[]);
        let err = no_proto.run().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StencilError>(),
            Some(StencilError::MissingArgument { name }) if name == "prototype"
        ));
    }

    #[test]
    fn test_use_reports_all_missing_params() {
        let test_app = TestApp::new("guestbook");
        let (action, manager) = action(&test_app, &["single-port-deployment", "web"]);

        let err = action.run().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("--containerPort=<number>"));
        assert!(message.contains("--image=<string>"));
        assert!(manager.created.borrow().is_empty());
    }

    #[test]
    fn test_use_values_file_takes_precedence() {
        let test_app = TestApp::new("guestbook");
        let values = test_app.root().join("web.env");
        std::fs::write(&values, "image=redis\ncontainerPort=6379\n").unwrap();

        let values_flag = format!("--values-file={}", values.display());
        let (action, manager) =
            action(&test_app, &["single-port-deployment", "web", &values_flag, "--image=nginx"]);
        action.run().unwrap();

        let created = manager.created.borrow();
        assert_eq!(created[0].params["image"], "\"redis\"");
        assert_eq!(created[0].params["containerPort"], "6379");
        assert_eq!(created[0].params["name"], "\"web\"");
    }

    #[test]
    fn test_use_help_creates_nothing() {
        let test_app = TestApp::new("guestbook");
        let (action, manager) = action(&test_app, &["configmap", "--help"]);
        assert!(action.run().unwrap().is_none());
        assert!(manager.created.borrow().is_empty());
    }

    #[test]
    fn test_use_writes_component_with_default_stack() {
        let test_app = TestApp::new("guestbook");
        let action = PrototypeUse::new(
            Options::new().with(OPTION_APP, test_app.app.clone()).with(
                OPTION_ARGUMENTS,
                args(&["single-port-service", "web-svc", "--targetPort=http"]),
            ),
        )
        .unwrap();

        let path = action.run().unwrap().unwrap();
        assert_eq!(path, test_app.app.components_dir().join("web-svc.yaml"));

        let params = Namespace::root(&test_app.app).load_params().unwrap();
        assert_eq!(
            params.components["web-svc"],
            json!({"name": "web-svc", "type": "ClusterIP", "servicePort": 80, "targetPort": "http"})
        );

        let err = action.run().unwrap_err();
        assert!(err.to_string().starts_with("create component"));
    }

    #[test]
    fn test_new_requires_arguments() {
        let test_app = TestApp::new("guestbook");
        let err = PrototypeUse::new(Options::new().with(OPTION_APP, test_app.app.clone())).unwrap_err();
        assert!(matches!(err, StencilError::MissingOption { name } if name == "arguments"));
    }
}
