//! Immutable-per-version edge tables with secondary indexes
//!
//! Edges are stored under their inbound endpoint (channel or target) with a
//! reverse index from the outbound one. Writers clone-on-write through
//! `Arc::make_mut`; readers keep whichever version they picked up.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use graph_core::entities::{Edge, EdgeFilter, EdgeKey, EdgePage, ReactionEdge, SubscriptionEdge};
use graph_core::value_objects::{ActorId, Target};

#[derive(Debug, Clone, Default)]
pub(crate) struct EdgeTables {
    /// channel -> subscriber -> edge
    subscriptions: HashMap<ActorId, HashMap<ActorId, SubscriptionEdge>>,
    channels_by_subscriber: HashMap<ActorId, HashSet<ActorId>>,

    /// target -> actor -> edge
    reactions: HashMap<Target, HashMap<ActorId, ReactionEdge>>,
    targets_by_actor: HashMap<ActorId, HashSet<Target>>,
}

fn nested<'a, K, L, V>(map: &'a HashMap<K, HashMap<L, V>>, outer: &K, inner: &L) -> Option<&'a V>
where
    K: Hash + Eq,
    L: Hash + Eq,
{
    map.get(outer).and_then(|m| m.get(inner))
}

fn take_nested<K, L, V>(map: &mut HashMap<K, HashMap<L, V>>, outer: &K, inner: &L) -> Option<V>
where
    K: Hash + Eq,
    L: Hash + Eq,
{
    let inner_map = map.get_mut(outer)?;
    let value = inner_map.remove(inner);
    if inner_map.is_empty() {
        map.remove(outer);
    }
    value
}

fn unlink<K, V>(index: &mut HashMap<K, HashSet<V>>, key: &K, value: &V)
where
    K: Hash + Eq,
    V: Hash + Eq,
{
    if let Some(set) = index.get_mut(key) {
        set.remove(value);
        if set.is_empty() {
            index.remove(key);
        }
    }
}

impl EdgeTables {
    pub(crate) fn get(&self, key: &EdgeKey) -> Option<Edge> {
        match key {
            EdgeKey::Subscription {
                subscriber,
                channel,
            } => nested(&self.subscriptions, channel, subscriber)
                .cloned()
                .map(Edge::Subscription),
            EdgeKey::Reaction { actor, target } => nested(&self.reactions, target, actor)
                .cloned()
                .map(Edge::Reaction),
        }
    }

    pub(crate) fn contains(&self, key: &EdgeKey) -> bool {
        match key {
            EdgeKey::Subscription {
                subscriber,
                channel,
            } => nested(&self.subscriptions, channel, subscriber).is_some(),
            EdgeKey::Reaction { actor, target } => {
                nested(&self.reactions, target, actor).is_some()
            }
        }
    }

    /// Store an edge whose key is known to be free
    pub(crate) fn put(&mut self, edge: Edge) {
        match edge {
            Edge::Subscription(e) => {
                self.channels_by_subscriber
                    .entry(e.subscriber.clone())
                    .or_default()
                    .insert(e.channel.clone());
                self.subscriptions
                    .entry(e.channel.clone())
                    .or_default()
                    .insert(e.subscriber.clone(), e);
            }
            Edge::Reaction(e) => {
                self.targets_by_actor
                    .entry(e.actor.clone())
                    .or_default()
                    .insert(e.target.clone());
                self.reactions
                    .entry(e.target.clone())
                    .or_default()
                    .insert(e.actor.clone(), e);
            }
        }
    }

    pub(crate) fn remove(&mut self, key: &EdgeKey) -> Option<Edge> {
        match key {
            EdgeKey::Subscription {
                subscriber,
                channel,
            } => {
                let edge = take_nested(&mut self.subscriptions, channel, subscriber)?;
                unlink(&mut self.channels_by_subscriber, subscriber, channel);
                Some(Edge::Subscription(edge))
            }
            EdgeKey::Reaction { actor, target } => {
                let edge = take_nested(&mut self.reactions, target, actor)?;
                unlink(&mut self.targets_by_actor, actor, target);
                Some(Edge::Reaction(edge))
            }
        }
    }

    fn reactions_on<'a>(&'a self, target: &Target) -> impl Iterator<Item = &'a ReactionEdge> + 'a {
        self.reactions.get(target).into_iter().flat_map(HashMap::values)
    }

    /// Every edge selected by a filter, in no particular order
    pub(crate) fn select(&self, filter: &EdgeFilter) -> Vec<Edge> {
        match filter {
            EdgeFilter::SubscribersOf(channel) => self
                .subscriptions
                .get(channel)
                .into_iter()
                .flat_map(HashMap::values)
                .cloned()
                .map(Edge::Subscription)
                .collect(),
            EdgeFilter::SubscriptionsOf(subscriber) => self
                .channels_by_subscriber
                .get(subscriber)
                .into_iter()
                .flatten()
                .filter_map(|channel| nested(&self.subscriptions, channel, subscriber))
                .cloned()
                .map(Edge::Subscription)
                .collect(),
            EdgeFilter::ReactionsOn { target, kind } => self
                .reactions_on(target)
                .filter(|e| e.kind == *kind)
                .cloned()
                .map(Edge::Reaction)
                .collect(),
            EdgeFilter::ReactionsOnAny { targets, kind } => {
                let distinct: HashSet<&Target> = targets.iter().collect();
                distinct
                    .into_iter()
                    .flat_map(|target| self.reactions_on(target))
                    .filter(|e| e.kind == *kind)
                    .cloned()
                    .map(Edge::Reaction)
                    .collect()
            }
            EdgeFilter::ReactionsBy {
                actor,
                target_type,
                kind,
            } => self
                .targets_by_actor
                .get(actor)
                .into_iter()
                .flatten()
                .filter(|target| target_type.map_or(true, |t| target.target_type == t))
                .filter_map(|target| nested(&self.reactions, target, actor))
                .filter(|e| e.kind == *kind)
                .cloned()
                .map(Edge::Reaction)
                .collect(),
        }
    }

    pub(crate) fn count(&self, filter: &EdgeFilter) -> i64 {
        self.select(filter).len() as i64
    }

    /// Newest first by the filter's sort key, resuming after the cursor
    pub(crate) fn list(&self, filter: &EdgeFilter, page: &EdgePage) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .select(filter)
            .into_iter()
            .filter(|edge| {
                page.after
                    .as_ref()
                    .map_or(true, |cursor| cursor.precedes(filter.sort_key(edge)))
            })
            .collect();

        edges.sort_by(|a, b| filter.sort_key(b).cmp(&filter.sort_key(a)));
        edges.truncate(page.limit as usize);
        edges
    }
}
