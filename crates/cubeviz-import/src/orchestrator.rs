//! Staged cube import
//!
//! The pipeline runs once, front to back:
//!
//! 1. dataset (first by identifier)
//! 2. structure definition of that dataset
//! 3. dimensions, measures and attributes, fetched concurrently
//! 4. elements of every dimension and attribute, one query each, fanned out
//! 5. observations
//! 6. assembly into a validated [`CubeModel`]
//!
//! A stage that finds nothing fails the import with its own error. There are
//! no retries and no partial cubes.

use crate::config::ImportConfig;
use crate::error::ImportError;
use cubeviz_model::{
    Attribute, AttributeElement, CubeModel, DataStructureDefinition, Dataset, Dimension,
    DimensionElement, Measure, Node, Observation, Uri,
};
use cubeviz_store::StoreClient;
use futures::future::try_join_all;

/// Structure components found in stage 3
#[derive(Debug, Clone)]
struct Components {
    dimensions: Vec<Dimension>,
    measures: Vec<Measure>,
    attributes: Vec<Attribute>,
}

/// Elements found in stage 4, in dimension and attribute order
#[derive(Debug, Clone)]
struct Elements {
    dimensions: Vec<(Uri, Vec<DimensionElement>)>,
    attributes: Vec<(Uri, Vec<AttributeElement>)>,
}

/// Imports the first cube of a store
#[derive(Debug, Clone)]
pub struct ImportOrchestrator {
    client: StoreClient,
    config: ImportConfig,
}

impl ImportOrchestrator {
    /// Create an orchestrator over `client`
    #[inline]
    #[must_use]
    pub fn new(client: StoreClient, config: ImportConfig) -> Self {
        Self { client, config }
    }

    /// Store client
    #[inline]
    #[must_use]
    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Run the import pipeline
    ///
    /// # Errors
    /// - [`ImportError::StoreNotInitialized`] without a store backend
    /// - one `No*` variant for the first stage that finds nothing
    /// - [`ImportError::QueryExecution`] / [`ImportError::Parse`] when a
    ///   query fails
    /// - [`ImportError::Model`] when the data does not form a valid cube
    pub async fn import(&self) -> Result<CubeModel, ImportError> {
        if !self.client.is_connected() {
            return Err(ImportError::StoreNotInitialized);
        }
        tracing::info!(language = %self.config.label_language, "importing cube");

        let dataset = self.dataset().await?;
        let dsd = self.structure(&dataset).await?;
        let components = self.components(&dataset, &dsd).await?;
        let elements = self.elements(&dataset, &components).await?;
        let observations = self.observations(&dataset, &components).await?;

        let cube = assemble(dataset, dsd, components, elements, observations)?;
        tracing::info!(
            dataset = %cube.dataset().id,
            dimensions = cube.dimensions().len(),
            measures = cube.measures().len(),
            observations = cube.observations().len(),
            "cube imported"
        );
        Ok(cube)
    }

    fn language(&self) -> &str {
        &self.config.label_language
    }

    async fn dataset(&self) -> Result<Dataset, ImportError> {
        let nodes = self.client.datasets().await?;
        tracing::debug!(found = nodes.len(), "datasets");
        let node = nodes.first().ok_or(ImportError::NoDatasets)?;
        Ok(Dataset::from_node(node, self.language()))
    }

    async fn structure(&self, dataset: &Dataset) -> Result<DataStructureDefinition, ImportError> {
        let nodes = self.client.dsd(dataset.id.as_str()).await?;
        tracing::debug!(found = nodes.len(), "data structure definitions");
        let node = nodes.first().ok_or(ImportError::NoDsd)?;
        Ok(DataStructureDefinition::from_node(node, self.language()))
    }

    async fn components(
        &self,
        dataset: &Dataset,
        dsd: &DataStructureDefinition,
    ) -> Result<Components, ImportError> {
        let (ds, dsd) = (dataset.id.as_str(), dsd.id.as_str());
        let (dimensions, measures, attributes) = futures::try_join!(
            self.client.dimensions(ds, dsd),
            self.client.measures(ds, dsd),
            self.client.attributes(ds, dsd),
        )?;
        tracing::debug!(
            dimensions = dimensions.len(),
            measures = measures.len(),
            attributes = attributes.len(),
            "components"
        );

        if measures.is_empty() {
            return Err(ImportError::NoMeasures);
        }
        if dimensions.is_empty() {
            return Err(ImportError::NoDimensions);
        }

        let language = self.language();
        Ok(Components {
            dimensions: dimensions.iter().map(|n| Dimension::from_node(n, language)).collect(),
            measures: measures.iter().map(|n| Measure::from_node(n, language)).collect(),
            attributes: attributes.iter().map(|n| Attribute::from_node(n, language)).collect(),
        })
    }

    async fn elements(&self, dataset: &Dataset, components: &Components) -> Result<Elements, ImportError> {
        let ds = dataset.id.as_str();
        let dimension_fetches = components
            .dimensions
            .iter()
            .map(|d| self.client.dimension_elements(d.id.as_str(), ds));
        let attribute_fetches = components
            .attributes
            .iter()
            .map(|a| self.client.dimension_elements(a.id.as_str(), ds));

        let (dimension_nodes, attribute_nodes) =
            futures::try_join!(try_join_all(dimension_fetches), try_join_all(attribute_fetches))?;

        let language = self.language();
        let dimensions: Vec<(Uri, Vec<DimensionElement>)> = components
            .dimensions
            .iter()
            .zip(dimension_nodes)
            .map(|(dimension, nodes)| {
                let elements = nodes
                    .iter()
                    .map(|n| DimensionElement::from_node(n, &dimension.id, language))
                    .collect();
                (dimension.id.clone(), elements)
            })
            .collect();
        let attributes: Vec<(Uri, Vec<AttributeElement>)> = components
            .attributes
            .iter()
            .zip(attribute_nodes)
            .map(|(attribute, nodes)| {
                let elements = nodes
                    .iter()
                    .map(|n| AttributeElement::from_node(n, &attribute.id, language))
                    .collect();
                (attribute.id.clone(), elements)
            })
            .collect();

        let total: usize = dimensions.iter().map(|(_, e)| e.len()).sum();
        tracing::debug!(
            dimension_elements = total,
            attribute_elements = attributes.iter().map(|(_, e)| e.len()).sum::<usize>(),
            "elements"
        );
        if total == 0 {
            return Err(ImportError::NoDimensionElements);
        }

        Ok(Elements { dimensions, attributes })
    }

    async fn observations(
        &self,
        dataset: &Dataset,
        components: &Components,
    ) -> Result<Vec<Observation>, ImportError> {
        let nodes = self.client.observations(dataset.id.as_str()).await?;
        tracing::debug!(found = nodes.len(), "observations");
        if nodes.is_empty() {
            return Err(ImportError::NoObservations);
        }

        let dimensions: Vec<Uri> = components.dimensions.iter().map(|d| d.id.clone()).collect();
        let measures: Vec<Uri> = components.measures.iter().map(|m| m.id.clone()).collect();
        let attributes: Vec<Uri> = components.attributes.iter().map(|a| a.id.clone()).collect();

        nodes
            .iter()
            .map(|node| to_observation(node, &dimensions, &measures, &attributes))
            .collect()
    }
}

fn to_observation(
    node: &Node,
    dimensions: &[Uri],
    measures: &[Uri],
    attributes: &[Uri],
) -> Result<Observation, ImportError> {
    Ok(Observation::from_node(node, dimensions, measures, attributes)?)
}

fn assemble(
    dataset: Dataset,
    dsd: DataStructureDefinition,
    components: Components,
    elements: Elements,
    observations: Vec<Observation>,
) -> Result<CubeModel, ImportError> {
    let mut builder = CubeModel::builder(dataset, dsd)
        .measures(components.measures)
        .dimensions(components.dimensions)
        .attributes(components.attributes)
        .observations(observations);
    for (dimension, items) in elements.dimensions {
        builder = builder.dimension_elements(dimension, items);
    }
    for (attribute, items) in elements.attributes {
        builder = builder.attribute_elements(attribute, items);
    }
    Ok(builder.build()?)
}
