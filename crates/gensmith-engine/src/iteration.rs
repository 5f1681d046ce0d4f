//! Expansion of a template into its render units.
//!
//! A template without `with_items` yields one unit bound to the plain
//! variables. A template with N items yields N units in item order, each with
//! `item` bound. Units are produced lazily and the sequence can be restarted by
//! cloning it.

use std::fmt;
use std::iter::FusedIterator;

use crate::bindings::Bindings;
use crate::spec::TemplateSpec;

/// Where a render unit comes from, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitLocation {
    /// Index of the template in its generator spec.
    pub template_index: usize,
    /// Index into `with_items`, for iterated templates.
    pub item_index: Option<usize>,
}

impl fmt::Display for UnitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item_index {
            Some(item) => write!(f, "templates[{}] item {}", self.template_index, item),
            None => write!(f, "templates[{}]", self.template_index),
        }
    }
}

/// One (template, bindings) pair to render.
#[derive(Debug, Clone)]
pub struct RenderUnit<'a> {
    pub location: UnitLocation,
    pub template: &'a TemplateSpec,
    pub bindings: Bindings,
}

/// Lazy sequence of the render units of one template.
#[derive(Debug, Clone)]
pub struct RenderUnits<'a> {
    template_index: usize,
    template: &'a TemplateSpec,
    bindings: Bindings,
    next: usize,
}

/// Expand `template` (at `template_index` in its spec) against `bindings`.
pub fn expand<'a>(
    template_index: usize,
    template: &'a TemplateSpec,
    bindings: &Bindings,
) -> RenderUnits<'a> {
    RenderUnits {
        template_index,
        template,
        bindings: bindings.clone(),
        next: 0,
    }
}

impl RenderUnits<'_> {
    fn total(&self) -> usize {
        self.template.with_items.len().max(1)
    }
}

impl<'a> Iterator for RenderUnits<'a> {
    type Item = RenderUnit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total() {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let unit = match self.template.with_items.get(index) {
            Some(item) => RenderUnit {
                location: UnitLocation {
                    template_index: self.template_index,
                    item_index: Some(index),
                },
                template: self.template,
                bindings: self.bindings.with_item(item.clone()),
            },
            None => RenderUnit {
                location: UnitLocation {
                    template_index: self.template_index,
                    item_index: None,
                },
                template: self.template,
                bindings: self.bindings.clone(),
            },
        };
        Some(unit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RenderUnits<'_> {}

impl FusedIterator for RenderUnits<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Item;

    fn template(items: Vec<Item>) -> TemplateSpec {
        TemplateSpec {
            source: "t.tmpl".into(),
            target: "{{ item }}.txt".into(),
            condition: String::new(),
            with_items: items,
        }
    }

    #[test]
    fn test_plain_template_yields_single_unit() {
        let spec = template(vec![]);
        let bindings: Bindings = [("name", "x")].into_iter().collect();
        let units: Vec<_> = expand(2, &spec, &bindings).collect();

        assert_eq!(units.len(), 1);
        assert_eq!(
            units[0].location,
            UnitLocation {
                template_index: 2,
                item_index: None
            }
        );
        assert_eq!(units[0].bindings, bindings);
        assert!(units[0].bindings.item().is_none());
    }

    #[test]
    fn test_items_yield_units_in_order() {
        let spec = template(vec!["a".into(), "b".into(), "c".into()]);
        let units = expand(0, &spec, &Bindings::default());
        assert_eq!(units.len(), 3);

        let items: Vec<_> = units
            .map(|u| (u.location.item_index, u.bindings.item().cloned()))
            .collect();
        assert_eq!(
            items,
            vec![
                (Some(0), Some(Item::from("a"))),
                (Some(1), Some(Item::from("b"))),
                (Some(2), Some(Item::from("c"))),
            ]
        );
    }

    #[test]
    fn test_units_are_restartable_by_clone() {
        let spec = template(vec!["a".into(), "b".into()]);
        let mut units = expand(0, &spec, &Bindings::default());
        let fresh = units.clone();

        assert!(units.next().is_some());
        assert_eq!(units.len(), 1);
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh.count(), 2);
    }

    #[test]
    fn test_exhausted_sequence_stays_exhausted() {
        let spec = template(vec![]);
        let mut units = expand(0, &spec, &Bindings::default());
        assert!(units.next().is_some());
        assert!(units.next().is_none());
        assert!(units.next().is_none());
    }

    #[test]
    fn test_location_display() {
        let plain = UnitLocation {
            template_index: 1,
            item_index: None,
        };
        let iterated = UnitLocation {
            template_index: 1,
            item_index: Some(3),
        };
        assert_eq!(plain.to_string(), "templates[1]");
        assert_eq!(iterated.to_string(), "templates[1] item 3");
    }
}
